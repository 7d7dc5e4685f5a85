use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use serde_json::Value;
use sweets::{
    ApiError, FormError, RegisterForm, Session, ShopClient, SweetForm, SweetQuery,
    parse_restock_amount,
};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("{0}")]
    Form(#[from] FormError),
    #[error("failed to render output: {0}")]
    Render(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "sweet-cli", about = "Sweet shop inventory API CLI")]
struct Cli {
    #[arg(long, env = "SWEET_BASE_URL", default_value = "http://127.0.0.1:8000")]
    base_url: String,

    #[arg(long, env = "SWEET_ACCESS_TOKEN")]
    access_token: Option<String>,

    /// Whether the token belongs to an admin account; `login` prints the
    /// right value for this flag.
    #[arg(long, env = "SWEET_IS_ADMIN", default_value_t = false)]
    is_admin: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login(LoginArgs),
    Register(RegisterArgs),
    Refresh(RefreshArgs),
    Logout,
    Sweet(SweetCommand),
}

#[derive(Args, Debug)]
struct LoginArgs {
    #[arg(long)]
    username: String,

    #[arg(long)]
    password: String,
}

#[derive(Args, Debug)]
struct RegisterArgs {
    #[arg(long)]
    username: String,

    #[arg(long)]
    email: String,

    #[arg(long)]
    password: String,

    #[arg(long, help = "Confirmation copy of the password")]
    password2: String,
}

#[derive(Args, Debug)]
struct RefreshArgs {
    #[arg(long, env = "SWEET_REFRESH_TOKEN")]
    refresh_token: String,
}

#[derive(Args, Debug)]
struct SweetCommand {
    #[command(subcommand)]
    command: SweetSubcommand,
}

#[derive(Subcommand, Debug)]
enum SweetSubcommand {
    List(ListArgs),
    Show {
        id: i64,
    },
    Create(CreateArgs),
    Update(UpdateArgs),
    Delete {
        id: i64,
    },
    Purchase {
        id: i64,
    },
    Restock {
        id: i64,
        #[arg(long)]
        amount: String,
    },
}

#[derive(Args, Debug)]
struct ListArgs {
    #[arg(long, help = "Substring search across name, category, and price")]
    search: Option<String>,

    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    category: Option<String>,

    #[arg(long)]
    min_price: Option<Decimal>,

    #[arg(long)]
    max_price: Option<Decimal>,
}

#[derive(Args, Debug)]
struct CreateArgs {
    #[arg(long)]
    name: String,

    #[arg(long)]
    category: String,

    #[arg(long)]
    price: String,

    #[arg(long)]
    quantity: String,
}

#[derive(Args, Debug)]
struct UpdateArgs {
    id: i64,

    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    category: Option<String>,

    #[arg(long)]
    price: Option<String>,

    #[arg(long)]
    quantity: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut client = ShopClient::new(cli.base_url.clone());
    if let Some(token) = cli.access_token.clone() {
        client = client.with_session(Session::new(token, cli.is_admin));
    }

    match cli.command {
        Command::Login(args) => run_login(&mut client, args).await,
        Command::Register(args) => run_register(&client, args).await,
        Command::Refresh(args) => run_refresh(&mut client, args).await,
        Command::Logout => run_logout(&mut client),
        Command::Sweet(sweet) => run_sweet(&client, sweet).await,
    }
}

async fn run_login(client: &mut ShopClient, args: LoginArgs) -> Result<(), CliError> {
    let session = client.login(&args.username, &args.password).await?;
    eprintln!(
        "logged in as {}",
        if session.is_admin { "admin" } else { "standard user" }
    );
    // The shell is the session store; eval these to carry the login forward.
    println!("export SWEET_ACCESS_TOKEN={}", session.access);
    println!("export SWEET_IS_ADMIN={}", session.is_admin);
    if let Some(refresh) = &session.refresh {
        println!("export SWEET_REFRESH_TOKEN={refresh}");
    }
    Ok(())
}

async fn run_register(client: &ShopClient, args: RegisterArgs) -> Result<(), CliError> {
    let request = RegisterForm {
        username: args.username,
        email: args.email,
        password: args.password,
        password2: args.password2,
    }
    .parse()?;

    let access = client.register(&request).await?;
    eprintln!("registration successful; you can now log in");
    if let Some(access) = access {
        println!("export SWEET_ACCESS_TOKEN={access}");
    }
    Ok(())
}

async fn run_refresh(client: &mut ShopClient, args: RefreshArgs) -> Result<(), CliError> {
    let access = client.refresh(&args.refresh_token).await?;
    println!("export SWEET_ACCESS_TOKEN={access}");
    Ok(())
}

fn run_logout(client: &mut ShopClient) -> Result<(), CliError> {
    client.logout();
    eprintln!("session cleared");
    println!("unset SWEET_ACCESS_TOKEN SWEET_IS_ADMIN SWEET_REFRESH_TOKEN");
    Ok(())
}

async fn run_sweet(client: &ShopClient, sweet: SweetCommand) -> Result<(), CliError> {
    match sweet.command {
        SweetSubcommand::List(args) => {
            let query = SweetQuery {
                search: args.search,
                name: args.name,
                category: args.category,
                min_price: args.min_price,
                max_price: args.max_price,
            };
            let sweets = client.sweets(&query).await?;
            eprintln!("{} results", sweets.len());
            print_json(&serde_json::to_value(&sweets)?)
        }
        SweetSubcommand::Show { id } => {
            let sweet = client.sweet(id).await?;
            print_json(&serde_json::to_value(&sweet)?)
        }
        SweetSubcommand::Create(args) => {
            require_admin(client, "create sweets")?;
            let input = SweetForm {
                name: args.name,
                category: args.category,
                price: args.price,
                quantity: args.quantity,
            }
            .parse()?;
            let created = client.create_sweet(&input).await?;
            eprintln!("created sweet {}", created.id);
            print_json(&serde_json::to_value(&created)?)
        }
        SweetSubcommand::Update(args) => {
            require_admin(client, "edit sweets")?;
            // Prefill from the current record, overlay the provided fields,
            // then PUT the full body.
            let current = client.sweet(args.id).await?;
            let input = SweetForm {
                name: args.name.unwrap_or(current.name),
                category: args.category.unwrap_or(current.category),
                price: args.price.unwrap_or_else(|| current.price.to_string()),
                quantity: args
                    .quantity
                    .unwrap_or_else(|| current.quantity.to_string()),
            }
            .parse()?;
            let updated = client.update_sweet(args.id, &input).await?;
            print_json(&serde_json::to_value(&updated)?)
        }
        SweetSubcommand::Delete { id } => {
            require_admin(client, "delete sweets")?;
            client.delete_sweet(id).await?;
            eprintln!("deleted sweet {id}");
            Ok(())
        }
        SweetSubcommand::Purchase { id } => {
            let sweet = client.purchase_sweet(id).await?;
            eprintln!("purchased 1 x {}; {} left", sweet.name, sweet.quantity);
            print_json(&serde_json::to_value(&sweet)?)
        }
        SweetSubcommand::Restock { id, amount } => {
            require_admin(client, "restock inventory")?;
            let amount = parse_restock_amount(&amount)?;
            let sweet = client.restock_sweet(id, amount).await?;
            eprintln!("restocked {} x {}; now {}", amount, sweet.name, sweet.quantity);
            print_json(&serde_json::to_value(&sweet)?)
        }
    }
}

fn require_admin(client: &ShopClient, action: &'static str) -> Result<(), ApiError> {
    match client.session() {
        Some(session) => session.require_admin(action),
        None => Err(ApiError::MissingToken),
    }
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
