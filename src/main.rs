use std::{path::Path, sync::Arc};

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

use moviebot::{
    data::{movielens::has_data_files, CatalogSource, MovieLensSource},
    Chatbot, Config,
};

const PROMPT: &str = "> ";
const QUIT: &str = ":quit";
const DEBUG: &str = ":debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // logs go to stderr so the conversation on stdout stays readable
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let data_dir = Path::new(&config.data_dir);
    if !has_data_files(data_dir) {
        anyhow::bail!(
            "expected movies.txt, ratings.txt and sentiment.txt in {}",
            data_dir.display()
        );
    }

    let source = MovieLensSource::new(data_dir, config.binarize_threshold);
    let data = source
        .load()
        .await
        .with_context(|| format!("Failed to load data from {}", data_dir.display()))?;

    let mut bot = Chatbot::new(Arc::new(data), config.features());
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    say(&mut stdout, &bot.intro()).await?;
    let greeting = bot.greeting();
    say(&mut stdout, &greeting).await?;

    loop {
        stdout.write_all(PROMPT.as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match line.trim() {
            QUIT => break,
            DEBUG => {
                let snapshot = serde_json::to_string_pretty(&bot.debug_snapshot())?;
                say(&mut stdout, &snapshot).await?;
            }
            _ => {
                let response = bot.process(&line);
                say(&mut stdout, &response).await?;
            }
        }
    }

    let farewell = bot.farewell();
    say(&mut stdout, &farewell).await?;
    tracing::info!(session_id = %bot.session_id(), rated = bot.profile().rated_count(), "Session ended");
    Ok(())
}

async fn say(stdout: &mut tokio::io::Stdout, text: &str) -> std::io::Result<()> {
    stdout.write_all(text.as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await
}
