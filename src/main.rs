// main.rs - Operator console for the Slack vote bot
// Loads botconfig.txt and the command registry, checks the token against
// auth.test, then classifies whatever is typed on stdin so argument
// parsing can be tried against the live command registry.

use slack_vote_bot::{
    load_slack_config, parse_arguments, CommandRegistry, SlackClient, SlackConfig,
};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::signal;

fn load_commands(config: &SlackConfig) -> CommandRegistry {
    match CommandRegistry::load(&config.commands_file) {
        Ok(commands) => {
            log::info!(
                "✅ Loaded {} commands ({} voteable) from {}",
                commands.len(),
                commands.voteable().len(),
                config.commands_file
            );
            commands
        }
        Err(e) => {
            log::warn!(
                "⚠️ Could not load {}: {} - no command will be treated as voteable",
                config.commands_file,
                e
            );
            CommandRegistry::new()
        }
    }
}

async fn handle_command_line(config: &SlackConfig, commands: &CommandRegistry, bot_user_id: &str) {
    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin).lines();
    let mut stdout = io::stdout();

    println!("📝 Type command arguments to classify them. Type 'help' for available commands.");

    loop {
        if stdout.write_all(b"> ").await.is_err() || stdout.flush().await.is_err() {
            eprintln!("❌ Failed to write prompt");
            break;
        }

        let line = match reader.next_line().await {
            Ok(Some(line)) => line,
            // EOF reached
            Ok(None) => break,
            Err(e) => {
                eprintln!("❌ Error reading command line: {}", e);
                break;
            }
        };

        match line.trim() {
            "quit" | "q" | "exit" => {
                println!("⏹️  Shutting down...");
                break;
            }
            "help" | "h" => {
                println!("🤖 Available commands:");
                println!("  quit, q, exit  - Stop gracefully");
                println!("  help, h        - Show this help message");
                println!("  status         - Show bot status");
                println!("  <args...>      - Classify whitespace-separated arguments");
            }
            "status" => {
                println!("🤖 Bot user: {}", bot_user_id);
                println!("🗳️  Vote channel: #{}", config.channel);
                println!("📋 Voteable commands: {}", commands.voteable().join(", "));
            }
            "" => {}
            input => {
                let tokens: Vec<&str> = input.split_whitespace().collect();
                let (kinds, values) = parse_arguments(&tokens, commands);
                for ((token, kind), value) in tokens.iter().zip(&kinds).zip(&values) {
                    println!("  {:<40} {:<8} {}", token, kind, value);
                }
            }
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize logger - must be done before any logging calls
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let config = match load_slack_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("❌ Failed to load botconfig.txt: {}", e);
            eprintln!("Create a botconfig.txt file in the project root with: SLACK_TOKEN=xoxb-... and CHANNEL=<vote channel name>");
            return;
        }
    };

    let commands = load_commands(&config);

    let client = match SlackClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            log::error!("❌ Error creating Slack client: {}", e);
            return;
        }
    };

    let bot_user_id = match client.who_am_i().await {
        Ok(user_id) => {
            log::info!("✅ Authenticated as {}", user_id);
            user_id
        }
        Err(e) => {
            log::error!("❌ Slack authentication failed: {}", e);
            eprintln!("Check SLACK_TOKEN in botconfig.txt");
            return;
        }
    };

    tokio::select! {
        _ = signal::ctrl_c() => {
            println!("\n⏹️ Stopping gracefully...");
        }
        _ = handle_command_line(&config, &commands, &bot_user_id) => {}
    }

    println!("✅ Stopped");
}
