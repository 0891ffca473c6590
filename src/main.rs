use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use urban360::admin::{search_properties, PortfolioStats};
use urban360::api::{Catalog, ListingSource, UrbanClient};
use urban360::config::Config;
use urban360::feed::ListingFeed;
use urban360::filters::{selected_index, FilterPatch, FilterState, PRICE_RANGES};
use urban360::format::{format_price, whatsapp_link};
use urban360::models::{Category, NewInquiry, Property, PropertyType};
use urban360::session::{FileStore, Session};

#[derive(Parser)]
#[command(name = "urban360", about = "Browse and manage 360Urban property listings")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search listings through the API
    Listings(FilterArgs),
    /// Search listings in a local JSON file
    Offline {
        file: PathBuf,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Show featured listings
    Featured {
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Show one listing by slug
    Property { slug: String },
    /// List areas
    Areas,
    /// Show one area and its listings
    Area { slug: String },
    /// Print the price brackets accepted by --price-range
    Prices,
    Login {
        email: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Portfolio summary and the admin property table
    Admin {
        /// Case-insensitive match on title or address
        #[arg(long)]
        search: Option<String>,
    },
    /// Saved listings of the signed-in user
    Favorites {
        #[command(subcommand)]
        action: Option<FavoriteAction>,
    },
    /// Ask about a listing
    Inquire {
        slug: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        message: String,
    },
    /// Inquiries received by the agency
    Inquiries,
}

#[derive(Subcommand)]
enum FavoriteAction {
    Add { slug: String },
    Remove { slug: String },
    /// Whether a listing is saved
    Check { slug: String },
}

#[derive(Args)]
struct FilterArgs {
    /// Area slug, e.g. jabi
    #[arg(long)]
    area: Option<String>,
    #[arg(long)]
    category: Option<Category>,
    #[arg(long = "type")]
    property_type: Option<PropertyType>,
    #[arg(long)]
    min_price: Option<u64>,
    #[arg(long)]
    max_price: Option<u64>,
    /// Row of the price bracket table (see `prices`)
    #[arg(long, conflicts_with_all = ["min_price", "max_price"])]
    price_range: Option<usize>,
    #[arg(long)]
    page: Option<u32>,
    #[arg(long)]
    limit: Option<u32>,
}

impl FilterArgs {
    fn patches(&self) -> Vec<FilterPatch> {
        let mut patches = vec![
            FilterPatch::Area(self.area.clone()),
            FilterPatch::Category(self.category),
            FilterPatch::PropertyType(self.property_type),
            FilterPatch::MinPrice(self.min_price),
            FilterPatch::MaxPrice(self.max_price),
            FilterPatch::Page(self.page),
            FilterPatch::Limit(self.limit),
        ];
        if let Some(index) = self.price_range {
            patches.push(FilterPatch::PriceBracket(index));
        }
        patches
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = Config::load().context("Failed to load configuration")?;
    let client = UrbanClient::new(&config).context("Failed to create HTTP client")?;

    let mut session = Session::new(FileStore::new(&config.session_file));
    session.restore(&client);

    match cli.command {
        Command::Listings(args) => {
            info!("Searching listings at {}", client.base_url());
            run_feed(client, &args).await?;
        }
        Command::Offline { file, filters } => {
            let catalog = Catalog::from_json_file(&file)
                .await
                .with_context(|| format!("Failed to load {}", file.display()))?
                .page_limit(config.page_limit);
            run_feed(catalog, &filters).await?;
        }
        Command::Featured { limit } => {
            let featured = client.featured(limit).await.context("Failed to fetch featured listings")?;
            print_properties(&featured);
        }
        Command::Property { slug } => match client.property_by_slug(&slug).await? {
            Some(property) => print_property_detail(&property, &config),
            None => println!("Property Not Found: no listing with slug '{slug}'"),
        },
        Command::Areas => {
            for area in client.areas().await.context("Failed to fetch areas")? {
                println!("{:<12} {}", area.slug, area.name);
            }
        }
        Command::Area { slug } => {
            let found = client.area_by_slug(&slug).await?;
            match found {
                Some(area) => {
                    println!("Properties in {}\n{}\n", area.name, area.description);
                    let mut feed = ListingFeed::new(client);
                    feed.update(FilterPatch::Area(Some(area.slug)))?;
                    show_results(&mut feed).await;
                }
                None => println!("Area Not Found: no area with slug '{slug}'"),
            }
        }
        Command::Prices => {
            for (i, range) in PRICE_RANGES.iter().enumerate() {
                println!("{i}  {}", range.label);
            }
        }
        Command::Login { email, password } => {
            let signed_in = session
                .login(&client, &email, &password)
                .await
                .map(|user| user.display_name());
            match signed_in {
                Ok(name) => println!("Signed in as {name}"),
                Err(e) => anyhow::bail!(
                    "{}",
                    session.last_error().map(str::to_string).unwrap_or_else(|| e.to_string())
                ),
            }
        }
        Command::Logout => {
            session.logout(&client).await;
            println!("Signed out");
        }
        Command::Whoami => match session.user() {
            Some(user) => println!("{} <{}>", user.display_name(), user.email),
            None => println!("Not signed in"),
        },
        Command::Admin { search } => {
            let page = client
                .admin_properties()
                .await
                .context("Failed to fetch properties")?;
            let stats = PortfolioStats::from_properties(&page.data);

            println!("Total properties: {}", stats.total_properties);
            println!("Active listings:  {}", stats.active_listings);
            println!("Portfolio value:  {}", stats.portfolio_value_label());
            println!("\nRecent listings:");
            for property in &stats.recent {
                println!("  {} ({})", property.title, format_price(property.price));
            }

            let matches = search_properties(&page.data, search.as_deref().unwrap_or_default());
            println!("\n{} of {} properties\n", matches.len(), stats.total_properties);
            print_properties(&matches);
        }
        Command::Favorites { action } => {
            if !session.is_authenticated() {
                anyhow::bail!("Sign in to manage favorites");
            }
            match action {
                None => {
                    let saved = client.favorites(1, config.page_limit).await?;
                    println!("{} saved listing(s)\n", saved.total);
                    for favorite in saved.data {
                        match favorite.property {
                            Some(property) => print_properties(std::slice::from_ref(&property)),
                            None => println!("Property {}", favorite.property_id),
                        }
                    }
                }
                Some(FavoriteAction::Add { slug }) => {
                    client.add_favorite(&property_id(&client, &slug).await?).await?;
                    println!("Saved {slug}");
                }
                Some(FavoriteAction::Remove { slug }) => {
                    client.remove_favorite(&property_id(&client, &slug).await?).await?;
                    println!("Removed {slug}");
                }
                Some(FavoriteAction::Check { slug }) => {
                    let saved = client.is_favorited(&property_id(&client, &slug).await?).await?;
                    println!("{slug}: {}", if saved { "saved" } else { "not saved" });
                }
            }
        }
        Command::Inquire {
            slug,
            name,
            email,
            phone,
            message,
        } => {
            let inquiry = NewInquiry {
                name,
                email,
                phone,
                message,
                property_id: Some(property_id(&client, &slug).await?),
            };
            let sent = client
                .submit_inquiry(&inquiry)
                .await
                .context("Failed to send inquiry")?;
            println!("Inquiry {} sent", sent.id);
        }
        Command::Inquiries => {
            let received = client.inquiries(None).await.context("Failed to fetch inquiries")?;
            for inquiry in received.data {
                println!(
                    "[{:?}] {} <{}>: {}",
                    inquiry.status, inquiry.name, inquiry.email, inquiry.message
                );
            }
        }
    }

    Ok(())
}

async fn property_id(client: &UrbanClient, slug: &str) -> Result<String> {
    match client.property_by_slug(slug).await? {
        Some(property) => Ok(property.id),
        None => anyhow::bail!("Property Not Found: no listing with slug '{slug}'"),
    }
}

async fn run_feed<S: ListingSource>(source: S, args: &FilterArgs) -> Result<()> {
    let filters = FilterState::default().apply_all(args.patches());
    filters.validate().context("Invalid filters")?;
    let mut feed = ListingFeed::with_filters(source, filters);

    if let Err(e) = feed.load_areas().await {
        warn!("Could not load areas: {}", e);
    } else if let Some(area) = &feed.filters().area {
        if !feed.areas().iter().any(|a| &a.slug == area) {
            warn!("Unknown area '{}'", area);
        }
    }

    info!(
        "{} active filter(s), price bracket: {}",
        feed.filters().active_count(),
        PRICE_RANGES[selected_index(feed.filters())].label
    );
    show_results(&mut feed).await;
    Ok(())
}

async fn show_results<S: ListingSource>(feed: &mut ListingFeed<S>) {
    feed.refresh().await;

    if let Some(error) = feed.error() {
        println!("Could not load listings: {error}");
        return;
    }

    match feed.results() {
        Some(page) if !page.data.is_empty() => {
            println!(
                "Showing {} of {} properties (page {} of {})\n",
                page.data.len(),
                page.total,
                page.page,
                page.total_pages()
            );
            print_properties(&page.data);
        }
        _ => println!("No properties match your filters"),
    }
}

fn print_properties(properties: &[Property]) {
    for (i, property) in properties.iter().enumerate() {
        println!("{}. {} ({})", i + 1, property.title, format_price(property.price));
        println!(
            "   {} · {} · {} · {}",
            property.category, property.property_type, property.area_slug, property.status
        );
        println!(
            "   {} rooms, {} baths, {} parking",
            property.rooms, property.bathrooms, property.parking
        );
        println!("   Slug: {}", property.slug);
        if !property.is_available() {
            println!("   (not currently available)");
        }
        println!();
    }
}

fn print_property_detail(property: &Property, config: &Config) {
    print_properties(std::slice::from_ref(property));
    if !property.description.is_empty() {
        println!("{}\n", property.description);
    }
    if let Some(fee) = property.agent_fee {
        println!("Agent fee: {}", format_price(fee));
    }
    if let Some(fee) = property.inspection_fee {
        println!("Inspection fee: {}", format_price(fee));
    }
    for image in &property.images {
        println!("Image: {image}");
    }
    let area = if property.area.is_empty() {
        &property.area_slug
    } else {
        &property.area
    };
    println!(
        "Contact: {}",
        whatsapp_link(&config.whatsapp_number, &property.title, area)
    );
}
