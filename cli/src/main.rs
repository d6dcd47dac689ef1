use clap::error::ErrorKind;
use clap::{ArgGroup, CommandFactory, Parser, Subcommand};
use lingodesk::Config;
use lingodesk::auth::{SessionClaims, generate_token};
use lingodesk::model::entity::{
    Achievement,
    AchievementCreate,
    Category,
    CategoryCreate,
    Course,
    CourseCreate,
    Language,
    LanguageCreate,
    LearningModule,
    LearningModuleCreate,
    MembershipPlan,
    MembershipPlanCreate,
    UserEntity,
    UserEntityCreateUpdate,
};
use lingodesk::model::{CrudRepository, DatabaseError, DbConnection, ModelManager};
use lingodesk::web::{AuthenticatedUser, UserRole};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(about = "CLI tool for seeding the lingodesk catalogue", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage user profiles
    User {
        #[command(subcommand)]
        action: UserCommands,
    },

    /// Manage languages
    Language {
        #[command(subcommand)]
        action: LanguageCommands,
    },

    /// Manage courses
    Course {
        #[command(subcommand)]
        action: CourseCommands,
    },

    /// Manage learning categories
    Category {
        #[command(subcommand)]
        action: CategoryCommands,
    },

    /// Manage learning modules
    Module {
        #[command(subcommand)]
        action: ModuleCommands,
    },

    /// Manage achievements
    Achievement {
        #[command(subcommand)]
        action: AchievementCommands,
    },

    /// Manage membership plans
    Plan {
        #[command(subcommand)]
        action: PlanCommands,
    },
}

/// User management
#[derive(Subcommand, Debug)]
pub enum UserCommands {
    Add {
        #[arg(long)]
        email: String,
        #[arg(long)]
        display_name: String,
        /// `admin` or `user`
        #[arg(long, default_value = "user")]
        role: String,
    },
    /// Prints a development session token for an existing profile
    #[command(group(ArgGroup::new("profile").required(true).args(["id", "email"])))]
    Token {
        #[arg(long)]
        id: Option<Uuid>,
        #[arg(long)]
        email: Option<String>,
        /// Signing secret, `app.jwt` from the config when omitted
        #[arg(long)]
        secret: Option<String>,
        /// Token lifetime, at most ten years
        #[arg(long, default_value_t = 12, value_parser = clap::value_parser!(i64).range(1..=MAX_TOKEN_HOURS))]
        hours: i64,
    },
}

/// Language management
#[derive(Subcommand, Debug)]
pub enum LanguageCommands {
    Add {
        #[arg(long)]
        code: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        native_name: Option<String>,
        #[arg(long)]
        flag_emoji: Option<String>,
    },
}

/// Course management
#[derive(Subcommand, Debug)]
pub enum CourseCommands {
    Add {
        /// Code of the language the course teaches
        #[arg(long)]
        language_code: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value = "beginner")]
        level: String,
        #[arg(long, default_value_t = false)]
        published: bool,
        #[arg(long, default_value_t = 0)]
        order_index: i32,
    },
}

/// Category management
#[derive(Subcommand, Debug)]
pub enum CategoryCommands {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long, default_value_t = 0)]
        order_index: i32,
    },
}

/// Module management
#[derive(Subcommand, Debug)]
pub enum ModuleCommands {
    Add {
        /// Category name to attach the module to
        #[arg(long)]
        category_name: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value = "easy")]
        difficulty: String,
        #[arg(long, default_value_t = 10)]
        estimated_minutes: i32,
        #[arg(long, default_value_t = 10)]
        points: i32,
        #[arg(long, default_value_t = 0)]
        order_index: i32,
    },
}

/// Achievement management
#[derive(Subcommand, Debug)]
pub enum AchievementCommands {
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value_t = 10)]
        points: i32,
        /// e.g. `lessons_completed`, `streak_days`, `points_earned`
        #[arg(long)]
        requirement_type: String,
        #[arg(long, default_value_t = 1)]
        requirement_count: i32,
    },
}

/// Plan management
#[derive(Subcommand, Debug)]
pub enum PlanCommands {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value_t = 0)]
        price_cents: i32,
        #[arg(long, default_value_t = 30)]
        duration_days: i32,
        /// Repeat for every feature line
        #[arg(long = "feature")]
        features: Vec<String>,
    },
}

const MAX_TOKEN_HOURS: i64 = 24 * 365 * 10;

#[tokio::main]
async fn main() -> lingodesk::error::AppResult<()> {
    let _ = dotenvy::dotenv();
    let args = Cli::parse();
    let config = Config::get_or_init(true).await;

    let db_con = match std::env::var("DATABASE_URL") {
        Ok(url) => DbConnection::connect(&url)?,
        Err(_) => DbConnection::connect(config.app().database_uri())?,
    };
    let mm = ModelManager::new(db_con);
    let actor = AuthenticatedUser::system();

    match args.command {
        Commands::User { action } => match action {
            UserCommands::Add { email, display_name, role } => {
                let user = UserEntity::create(
                    &mm,
                    &actor,
                    UserEntityCreateUpdate {
                        id: None,
                        email,
                        display_name,
                        avatar_url: None,
                        role: UserRole::from(role.as_str()),
                    },
                )
                .await?;
                println!("User created: {:?}", user);
            }

            UserCommands::Token { id, email, secret, hours } => {
                let user = match (id, email) {
                    (Some(id), _) => UserEntity::find_by_id(&mm, &actor, id).await?,
                    (None, Some(email)) => UserEntity::find_by_email(&mm, &actor, &email).await?,
                    (None, None) => None,
                }
                .ok_or(DatabaseError::SqlxError(sqlx::Error::RowNotFound))?;
                let secret = secret.as_deref().unwrap_or(config.app().jwt());
                let Some(expires_at) = chrono::Duration::try_hours(hours)
                    .and_then(|d| chrono::Utc::now().checked_add_signed(d))
                else {
                    Cli::command()
                        .error(ErrorKind::ValueValidation, format!("--hours {hours} is out of range"))
                        .exit()
                };
                let claims = SessionClaims {
                    sub: user.id().to_string(),
                    exp: expires_at.timestamp(),
                    email: Some(user.email().to_string()),
                };
                println!("{}", generate_token(claims, secret)?);
            }
        },

        Commands::Language { action } => match action {
            LanguageCommands::Add { code, name, native_name, flag_emoji } => {
                let language = Language::create(
                    &mm,
                    &actor,
                    LanguageCreate {
                        code: code.trim().to_lowercase(),
                        name,
                        native_name,
                        flag_emoji,
                        is_active: true,
                    },
                )
                .await?;
                println!("Language created: {:?}", language);
            }
        },

        Commands::Course { action } => match action {
            CourseCommands::Add {
                language_code,
                title,
                description,
                level,
                published,
                order_index,
            } => {
                let language = Language::find_by_code(&mm, &actor, &language_code)
                    .await?
                    .ok_or(DatabaseError::SqlxError(sqlx::Error::RowNotFound))?;

                let course = Course::create(
                    &mm,
                    &actor,
                    CourseCreate {
                        language_id: language.id(),
                        title,
                        description,
                        level: level.to_lowercase(),
                        is_published: published,
                        order_index,
                    },
                )
                .await?;
                println!("Course created: {:?}", course);
            }
        },

        Commands::Category { action } => match action {
            CategoryCommands::Add { name, description, icon, color, order_index } => {
                let category = Category::create(
                    &mm,
                    &actor,
                    CategoryCreate {
                        name,
                        description,
                        icon,
                        color,
                        order_index,
                    },
                )
                .await?;
                println!("Category created: {:?}", category);
            }
        },

        Commands::Module { action } => match action {
            ModuleCommands::Add {
                category_name,
                title,
                description,
                difficulty,
                estimated_minutes,
                points,
                order_index,
            } => {
                let category_id: Uuid =
                    sqlx::query_scalar("SELECT id FROM learning_categories WHERE name = $1")
                        .bind(&category_name)
                        .fetch_one(mm.executor())
                        .await
                        .map_err(DatabaseError::SqlxError)?;

                let module = LearningModule::create(
                    &mm,
                    &actor,
                    LearningModuleCreate {
                        category_id,
                        title,
                        description,
                        difficulty: difficulty.to_lowercase(),
                        estimated_minutes: estimated_minutes.max(1),
                        points: points.max(1),
                        order_index,
                    },
                )
                .await?;
                println!("Module created: {:?}", module);
            }
        },

        Commands::Achievement { action } => match action {
            AchievementCommands::Add {
                title,
                description,
                points,
                requirement_type,
                requirement_count,
            } => {
                let achievement = Achievement::create(
                    &mm,
                    &actor,
                    AchievementCreate {
                        title,
                        description,
                        icon: None,
                        points: points.max(1),
                        requirement_type: requirement_type.to_lowercase(),
                        requirement_count: requirement_count.max(1),
                    },
                )
                .await?;
                println!("Achievement created: {:?}", achievement);
            }
        },

        Commands::Plan { action } => match action {
            PlanCommands::Add {
                name,
                description,
                price_cents,
                duration_days,
                features,
            } => {
                let plan = MembershipPlan::create(
                    &mm,
                    &actor,
                    MembershipPlanCreate {
                        name,
                        description,
                        price_cents: price_cents.max(0),
                        duration_days: duration_days.max(1),
                        features,
                        is_active: true,
                    },
                )
                .await?;
                println!("Plan created: {:?}", plan);
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    fn token_hours(args: &[&str]) -> Result<i64, clap::Error> {
        let cli = Cli::try_parse_from(args)?;
        match cli.command {
            Commands::User { action: UserCommands::Token { hours, .. } } => Ok(hours),
            _ => panic!("not a token command"),
        }
    }

    #[test]
    fn token_hours_default_and_range() {
        let base = ["lingodesk-cli", "user", "token", "--email", "admin@example.com"];
        assert_eq!(token_hours(&base).unwrap(), 12);

        let huge = [&base[..], &["--hours", "9223372036854775807"][..]].concat();
        let err = token_hours(&huge).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);

        let zero = [&base[..], &["--hours", "0"][..]].concat();
        assert!(token_hours(&zero).is_err());

        let year = [&base[..], &["--hours", "8760"][..]].concat();
        assert_eq!(token_hours(&year).unwrap(), 8760);
    }
}
