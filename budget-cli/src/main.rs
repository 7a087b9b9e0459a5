//! Budget CLI
//!
//! Command-line interface for the Budget API.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use serde_json::json;

use budget_client::BudgetClient;
use budget_types::{TransactionDetails, TransactionUid, validate_transaction_payload};

#[derive(Parser)]
#[command(name = "budget")]
#[command(author, version, about = "Budget API CLI client", long_about = None)]
struct Cli {
    /// Base URL of the Budget API
    #[arg(long, env = "BUDGET_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    /// ID token for authentication
    #[arg(long, env = "BUDGET_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List your transactions, newest first
    List,
    /// Get a transaction
    Get {
        /// Transaction uid (UUID)
        uid: String,
    },
    /// Record a new transaction
    Create(TransactionArgs),
    /// Replace the fields of a transaction
    Update {
        /// Transaction uid (UUID)
        uid: String,
        #[command(flatten)]
        fields: TransactionArgs,
    },
    /// Delete a transaction
    Delete {
        /// Transaction uid (UUID)
        uid: String,
    },
    /// Check API health
    Health,
}

#[derive(Args, Debug)]
struct TransactionArgs {
    /// Calendar date (YYYY-MM-DD)
    #[arg(long)]
    date: String,
    /// Signed amount
    #[arg(long, allow_negative_numbers = true)]
    value: f64,
    /// Currency code
    #[arg(long, default_value = "USD")]
    currency: String,
    /// Category label, e.g. Groceries
    #[arg(long)]
    category: String,
    /// income or expense
    #[arg(long = "type")]
    kind: String,
    /// Free text
    #[arg(long)]
    description: Option<String>,
}

impl TransactionArgs {
    /// Checks the fields with the same rules the server applies.
    fn into_details(self) -> Result<TransactionDetails> {
        let mut payload = json!({
            "date": self.date,
            "money": { "currency": self.currency, "value": self.value },
            "transactionType": self.category,
            "type": self.kind,
        });
        if let Some(description) = self.description {
            payload["description"] = json!(description);
        }

        Ok(validate_transaction_payload(&payload)?)
    }
}

fn parse_uid(s: &str) -> Result<TransactionUid> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("Invalid transaction uid: {}", s))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut client = BudgetClient::new(&cli.api_url);
    if let Some(token) = cli.token {
        client = client.with_token(token);
    }

    match cli.command {
        Commands::Health => {
            let healthy = client.health().await?;
            if healthy {
                println!("✓ API is healthy");
            } else {
                println!("✗ API is not healthy");
                std::process::exit(1);
            }
        }
        Commands::List => {
            let transactions = client.list_transactions().await?;
            println!("{}", serde_json::to_string_pretty(&transactions)?);
        }
        Commands::Get { uid } => {
            let tx = client.get_transaction(parse_uid(&uid)?).await?;
            println!("{}", serde_json::to_string_pretty(&tx)?);
        }
        Commands::Create(fields) => {
            let tx = client.create_transaction(&fields.into_details()?).await?;
            println!("{}", serde_json::to_string_pretty(&tx)?);
        }
        Commands::Update { uid, fields } => {
            let uid = parse_uid(&uid)?;
            let tx = client
                .update_transaction(uid, &fields.into_details()?)
                .await?;
            println!("{}", serde_json::to_string_pretty(&tx)?);
        }
        Commands::Delete { uid } => {
            let tx = client.delete_transaction(parse_uid(&uid)?).await?;
            println!("{}", serde_json::to_string_pretty(&tx)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use budget_types::TransactionKind;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_create_arguments_become_details() {
        let cli = parse(&[
            "budget",
            "create",
            "--date",
            "2023-01-01",
            "--value",
            "-12.5",
            "--category",
            "Groceries",
            "--type",
            "expense",
        ]);

        let Commands::Create(fields) = cli.command else {
            panic!("expected create");
        };
        let details = fields.into_details().unwrap();
        assert_eq!(details.kind, TransactionKind::Expense);
        assert_eq!(details.money.value(), -12.5);
        assert_eq!(details.money.currency(), "USD");
    }

    #[test]
    fn test_invalid_type_is_rejected_locally() {
        let cli = parse(&[
            "budget",
            "update",
            "8f14e45f-ceea-467f-a7c5-b2f1f0e2d3a4",
            "--date",
            "2023-01-01",
            "--value",
            "3",
            "--category",
            "Rent",
            "--type",
            "transfer",
        ]);

        let Commands::Update { fields, .. } = cli.command else {
            panic!("expected update");
        };
        let err = fields.into_details().unwrap_err();
        assert_eq!(err.to_string(), "Invalid type");
    }

    #[test]
    fn test_parse_uid() {
        assert!(parse_uid("8f14e45f-ceea-467f-a7c5-b2f1f0e2d3a4").is_ok());
        assert!(parse_uid("42").is_err());
    }
}
