use chrono::{Duration, Local};
use clap::Parser;
use fake::{
    faker::{
        internet::en::SafeEmail,
        lorem::en::{Paragraph, Sentence},
        name::en::Name,
    },
    Fake,
};
use noticeboard::{
    config::DatabaseConfig,
    db,
    domain::{CreateAnnouncementRequest, CreateUserRequest, Role},
    error::AppError,
    repository::{
        AnnouncementRepository, SqliteAnnouncementRepository,
        SqliteUserRepository, UserRepository,
    },
};
use rand::Rng;

/// Fill a development database with users and announcements.
#[derive(Debug, Parser)]
struct Args {
    /// SQLite database to seed (created if missing)
    #[arg(long, default_value = "sqlite://announcement_system.db")]
    database_url: String,

    /// Number of announcer accounts to create besides the admin
    #[arg(long, default_value_t = 3)]
    announcers: usize,

    /// Number of announcements to spread across all users
    #[arg(long, default_value_t = 10)]
    announcements: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    println!("🌱 Starting database seeding...");

    let db_pool = db::connect(&DatabaseConfig {
        url: args.database_url.clone(),
        max_connections: 5,
    })
    .await?;

    println!("📋 Initializing schema...");
    db::initialize_schema(&db_pool).await?;

    let user_repo = SqliteUserRepository::new(db_pool.clone());
    let announcement_repo = SqliteAnnouncementRepository::new(db_pool.clone());

    println!("👥 Creating users...");

    let admin = match user_repo.create(CreateUserRequest {
        name: "Admin User".to_string(),
        email: "admin@noticeboard.local".to_string(),
        role: Role::Admin,
        password: Some("admin123".to_string()),
    }).await {
        Ok(admin) => admin,
        Err(AppError::Constraint(_)) => user_repo
            .find_by_email("admin@noticeboard.local")
            .await?
            .ok_or_else(|| anyhow::anyhow!("admin user vanished during seeding"))?,
        Err(e) => return Err(e.into()),
    };

    let mut announcer_ids = vec![admin.id];
    for _ in 0..args.announcers {
        let request = CreateUserRequest {
            name: Name().fake(),
            email: SafeEmail().fake(),
            role: Role::Announcer,
            password: None,
        };

        match user_repo.create(request).await {
            Ok(user) => announcer_ids.push(user.id),
            // Generated emails occasionally collide; skip those
            Err(AppError::Constraint(msg)) => println!("  ⚠️  Skipped announcer: {}", msg),
            Err(e) => return Err(e.into()),
        }
    }

    println!("  ✅ {} users available", announcer_ids.len());

    println!("📢 Creating announcements...");

    let today = Local::now().date_naive();
    let mut rng = rand::thread_rng();

    for _ in 0..args.announcements {
        let start_date = today - Duration::days(rng.gen_range(0..7));
        let end_date = today + Duration::days(rng.gen_range(1..30));
        let announcer_id = announcer_ids[rng.gen_range(0..announcer_ids.len())];

        announcement_repo.create(CreateAnnouncementRequest {
            title: Sentence(3..7).fake(),
            body: Paragraph(2..4).fake(),
            image: None,
            start_date,
            end_date,
            is_urgent: rng.gen_bool(0.25),
            announcer_id,
        }).await?;
    }

    println!("  ✅ Created {} announcements", args.announcements);
    println!("🎉 Seeding complete!");

    Ok(())
}
