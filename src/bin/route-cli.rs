use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "route-cli")]
#[command(about = "Command-line client for the route widget service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Side {
    Start,
    End,
}

impl Side {
    fn as_str(self) -> &'static str {
        match self {
            Side::Start => "start",
            Side::End => "end",
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Check service status
    Health,
    /// Open a new widget session
    New,
    /// Close a widget session
    Close { session: String },
    /// Type text into one location field
    Type {
        session: String,
        #[arg(value_enum)]
        field: Side,
        text: String,
    },
    /// Show the suggestion list of one field
    Suggestions {
        session: String,
        #[arg(value_enum)]
        field: Side,
    },
    /// Pick a suggestion by position
    Select {
        session: String,
        #[arg(value_enum)]
        field: Side,
        index: usize,
    },
    /// Close the suggestion list of one field without selecting
    Dismiss {
        session: String,
        #[arg(value_enum)]
        field: Side,
    },
    /// Resolve a route; omitted sides use the current input text
    Route {
        session: String,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
    },
    /// Print a share link for the current route
    Share { session: String },
    /// Load a share link into a session
    Open { session: String, link: String },
    /// Show the current overlay
    Overlay { session: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let widgets = format!("{}/widgets", cli.url.trim_end_matches('/'));

    let request = match cli.command {
        Commands::Health => client.get(format!("{}/health", cli.url.trim_end_matches('/'))),
        Commands::New => client.post(&widgets),
        Commands::Close { session } => client.delete(format!("{}/{}", widgets, session)),
        Commands::Type {
            session,
            field,
            text,
        } => client
            .put(format!("{}/{}/inputs/{}", widgets, session, field.as_str()))
            .json(&json!({ "text": text })),
        Commands::Suggestions { session, field } => {
            client.get(format!("{}/{}/suggestions/{}", widgets, session, field.as_str()))
        }
        Commands::Select {
            session,
            field,
            index,
        } => client
            .post(format!(
                "{}/{}/suggestions/{}/select",
                widgets,
                session,
                field.as_str()
            ))
            .json(&json!({ "index": index })),
        Commands::Dismiss { session, field } => client.post(format!(
            "{}/{}/suggestions/{}/dismiss",
            widgets,
            session,
            field.as_str()
        )),
        Commands::Route { session, start, end } => client
            .post(format!("{}/{}/route", widgets, session))
            .json(&json!({ "start": start, "end": end })),
        Commands::Share { session } => client.get(format!("{}/{}/share", widgets, session)),
        Commands::Open { session, link } => client
            .post(format!("{}/{}/open", widgets, session))
            .json(&json!({ "url": link })),
        Commands::Overlay { session } => client.get(format!("{}/{}/overlay", widgets, session)),
    };

    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        match serde_json::from_str::<Value>(&text) {
            Ok(body) => eprintln!("{}", body["message"].as_str().unwrap_or(&text)),
            Err(_) if !text.is_empty() => eprintln!("Response: {}", text),
            Err(_) => {}
        }
        return Ok(());
    }

    if text.is_empty() {
        println!("{}", status);
        return Ok(());
    }
    let json: Value = serde_json::from_str(&text)?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
