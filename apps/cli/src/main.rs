use anyhow::Context;
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use contabot_config::load as load_config;
use contabot_database::{
    CreateOrganizationRequest, CreateTransactionRequest, CreateUserRequest, Currency, Language,
    OrganizationRepository, TransactionRepository, UserRepository,
};
use contabot_runtime::{telemetry, BackendServices};
use sqlx::Row;
use tracing::info;

#[derive(Parser)]
#[command(name = "contabot-cli")]
#[command(about = "Contabot data layer console")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dump organizations, users and transactions from the database
    DumpData,
    /// Seed the database with test data
    SeedData,
    /// Clear all records from the database
    ClearData,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::DumpData => dump_data().await,
        Commands::SeedData => seed_data().await,
        Commands::ClearData => clear_data().await,
    }
}

async fn initialise_services() -> anyhow::Result<BackendServices> {
    let config = load_config().context("failed to load configuration")?;

    BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")
}

async fn dump_data() -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise tracing")?;

    info!("dumping records from database");

    let services = initialise_services().await?;

    let organizations = sqlx::query(
        "SELECT id, created_at, name, currency, language FROM organizations",
    )
    .fetch_all(&services.db_pool)
    .await
    .context("failed to fetch organizations")?;

    println!("=== ORGANIZATIONS ===");
    if organizations.is_empty() {
        println!("No organizations found in database");
    } else {
        println!("Found {} organizations:", organizations.len());
        println!(
            "{:<5} {:<30} {:<10} {:<10} {:<30}",
            "ID", "Name", "Currency", "Language", "Created At"
        );
        println!("{}", "-".repeat(90));

        for organization in &organizations {
            let id: i64 = organization.get("id");
            let name: String = organization.get("name");
            let currency: String = organization.get("currency");
            let language: String = organization.get("language");
            let created_at: String = organization.get("created_at");

            println!(
                "{:<5} {:<30} {:<10} {:<10} {:<30}",
                id, name, currency, language, created_at
            );
        }
    }

    println!("\n=== USERS ===");
    let users = sqlx::query(
        "SELECT id, organization_id, created_at, whatsapp_phone, name, is_admin FROM users",
    )
    .fetch_all(&services.db_pool)
    .await
    .context("failed to fetch users")?;

    if users.is_empty() {
        println!("No users found in database");
    } else {
        println!("Found {} users:", users.len());
        println!(
            "{:<5} {:<10} {:<20} {:<25} {:<10} {:<30}",
            "ID", "Org ID", "WhatsApp Phone", "Name", "Admin", "Created At"
        );
        println!("{}", "-".repeat(105));

        for user in &users {
            let id: i64 = user.get("id");
            let organization_id: Option<i64> = user.get("organization_id");
            let whatsapp_phone: String = user.get("whatsapp_phone");
            let name: String = user.get("name");
            let is_admin: i64 = user.get("is_admin");
            let created_at: String = user.get("created_at");

            println!(
                "{:<5} {:<10} {:<20} {:<25} {:<10} {:<30}",
                id,
                organization_id
                    .map(|id| id.to_string())
                    .unwrap_or("NULL".to_string()),
                whatsapp_phone,
                name,
                is_admin != 0,
                created_at
            );
        }
    }

    println!("\n=== TRANSACTIONS (current year, per organization) ===");
    let organization_repo = OrganizationRepository::new(services.db_pool.clone());
    let transaction_repo = TransactionRepository::new(services.db_pool.clone());

    for organization in &organizations {
        let id: i64 = organization.get("id");
        let Some(organization) = organization_repo
            .find_by_id(id)
            .await
            .context("failed to fetch organization")?
        else {
            continue;
        };

        let transactions = transaction_repo
            .find_for_organization_year(Utc::now(), &organization)
            .await
            .context("failed to fetch transactions")?;

        println!("\n{} ({} transactions)", organization.name, transactions.len());
        if transactions.is_empty() {
            continue;
        }

        println!(
            "{:<5} {:<10} {:<20} {:<12} {:<10} {:<14} {:<30}",
            "ID", "User ID", "Label", "Value", "Currency", "Converted", "Created At"
        );
        println!("{}", "-".repeat(105));

        for transaction in &transactions {
            println!(
                "{:<5} {:<10} {:<20} {:<12} {:<10} {:<14} {:<30}",
                transaction.id,
                transaction
                    .user_id
                    .map(|id| id.to_string())
                    .unwrap_or("NULL".to_string()),
                transaction.label,
                transaction.value,
                transaction.currency,
                transaction.value_converted,
                transaction.created_at.to_rfc3339()
            );
        }
    }

    Ok(())
}

async fn seed_data() -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise tracing")?;

    info!("seeding database with test data");

    let services = initialise_services().await?;

    let organization_repo = OrganizationRepository::new(services.db_pool.clone());
    let user_repo = UserRepository::new(services.db_pool.clone());
    let transaction_repo = TransactionRepository::new(services.db_pool.clone());

    let now = Utc::now();

    let organization_id = organization_repo
        .create(&CreateOrganizationRequest {
            created_at: now,
            name: "Tienda La Esquina".to_string(),
            language: Language::Es,
            currency: Currency::Cop,
        })
        .await
        .context("failed to seed organization")?;

    user_repo
        .create(&CreateUserRequest {
            organization_id: Some(organization_id),
            created_at: now,
            whatsapp_phone: "+573001112233".to_string(),
            name: "Marcela".to_string(),
            is_admin: true,
        })
        .await
        .context("failed to seed admin user")?;

    user_repo
        .create(&CreateUserRequest {
            organization_id: Some(organization_id),
            created_at: now,
            whatsapp_phone: "+573004445566".to_string(),
            name: "Andrés".to_string(),
            is_admin: false,
        })
        .await
        .context("failed to seed member user")?;

    let admin = user_repo
        .find_by_phone("+573001112233")
        .await
        .context("failed to look up seeded admin")?
        .context("seeded admin user is missing")?;

    transaction_repo
        .record(&CreateTransactionRequest {
            user_id: Some(admin.id),
            created_at: now,
            label: "mercado".to_string(),
            value: 180_000.0,
            currency: "COP".to_string(),
            value_converted: 180_000.0,
            description: "compra semanal de mercado".to_string(),
        })
        .await
        .context("failed to seed transaction")?;

    transaction_repo
        .record(&CreateTransactionRequest {
            user_id: Some(admin.id),
            created_at: now - Duration::days(400),
            label: "arriendo".to_string(),
            value: 1_200_000.0,
            currency: "COP".to_string(),
            value_converted: 1_200_000.0,
            description: "arriendo del local, año pasado".to_string(),
        })
        .await
        .context("failed to seed prior-year transaction")?;

    println!("Database seeded with test data:");
    println!("- 1 organization created");
    println!("- 2 users created");
    println!("- 2 transactions created (one in the current year, one in the previous)");
    println!("Run 'dump-data' to see the inserted data");

    Ok(())
}

async fn clear_data() -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise tracing")?;

    info!("clearing all data from database");

    let services = initialise_services().await?;

    // Clear children first (due to foreign key constraints)
    let transactions_deleted = sqlx::query("DELETE FROM transactions")
        .execute(&services.db_pool)
        .await
        .context("failed to delete transactions")?;

    let users_deleted = sqlx::query("DELETE FROM users")
        .execute(&services.db_pool)
        .await
        .context("failed to delete users")?;

    let organizations_deleted = sqlx::query("DELETE FROM organizations")
        .execute(&services.db_pool)
        .await
        .context("failed to delete organizations")?;

    println!("Database cleared:");
    println!("- {} transactions deleted", transactions_deleted.rows_affected());
    println!("- {} users deleted", users_deleted.rows_affected());
    println!(
        "- {} organizations deleted",
        organizations_deleted.rows_affected()
    );

    Ok(())
}
