use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use maya_listings::config::AppConfig;
use maya_listings::logging::init_logging;
use maya_listings::models::format_price;
use maya_listings::{
    EventBus, FileStore, KeyValueStore, ListingFilter, ListingStore, NewProperty, Property,
    PropertyPatch, PropertyTag, PropertyType, SessionStore, StaticCredentials, StoreEvent,
    UserRole,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "maya", about = "Maya Real Estate listings and sessions")]
struct Cli {
    /// TOML configuration file (defaults to ./maya.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List properties, optionally filtered
    List {
        #[arg(long)]
        tag: Option<PropertyTag>,
        #[arg(long = "type")]
        property_type: Option<PropertyType>,
        #[arg(long)]
        min_price: Option<u64>,
        #[arg(long)]
        max_price: Option<u64>,
        #[arg(long)]
        min_bedrooms: Option<u32>,
    },
    /// Show one property in full
    Show { id: String },
    /// Sign in with email and password
    Login { email: String, password: String },
    /// Sign out
    Logout,
    /// Print the signed-in user
    Whoami,
    /// Add a property (admin only)
    Add(AddArgs),
    /// Change fields of a property (admin only)
    Update(UpdateArgs),
    /// Remove a property (admin only)
    Delete { id: String },
    /// Write all properties to a JSON file
    Export {
        #[arg(default_value = "maya_properties.json")]
        path: PathBuf,
    },
}

#[derive(Debug, Args)]
struct AddArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    price: u64,
    #[arg(long)]
    location: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long, default_value_t = 0)]
    bedrooms: u32,
    #[arg(long, default_value_t = 0)]
    bathrooms: u32,
    #[arg(long, default_value_t = 0)]
    area: u32,
    #[arg(long = "type", default_value = "Apartment")]
    property_type: PropertyType,
    /// Repeatable
    #[arg(long = "tag")]
    tags: Vec<PropertyTag>,
    /// Repeatable
    #[arg(long = "amenity")]
    amenities: Vec<String>,
    /// Repeatable; the first image is the card image
    #[arg(long = "image")]
    images: Vec<String>,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    id: String,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    price: Option<u64>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    bedrooms: Option<u32>,
    #[arg(long)]
    bathrooms: Option<u32>,
    #[arg(long)]
    area: Option<u32>,
    #[arg(long = "type")]
    property_type: Option<PropertyType>,
    /// Replaces all tags; repeatable
    #[arg(long = "tag")]
    tags: Vec<PropertyTag>,
    /// Replaces all amenities; repeatable
    #[arg(long = "amenity")]
    amenities: Vec<String>,
    /// Replaces the gallery and card image; repeatable
    #[arg(long = "image")]
    images: Vec<String>,
}

impl From<AddArgs> for NewProperty {
    fn from(args: AddArgs) -> Self {
        NewProperty {
            title: args.title,
            price: args.price,
            location: args.location,
            tags: args.tags,
            image: args.images.first().cloned().unwrap_or_default(),
            images: args.images,
            description: args.description,
            bedrooms: args.bedrooms,
            bathrooms: args.bathrooms,
            area: args.area,
            property_type: args.property_type,
            amenities: args.amenities,
        }
    }
}

impl UpdateArgs {
    fn into_patch(self) -> (String, PropertyPatch) {
        let patch = PropertyPatch {
            title: self.title,
            price: self.price,
            location: self.location,
            tags: (!self.tags.is_empty()).then_some(self.tags),
            image: self.images.first().cloned(),
            images: (!self.images.is_empty()).then_some(self.images),
            description: self.description,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            area: self.area,
            property_type: self.property_type,
            amenities: (!self.amenities.is_empty()).then_some(self.amenities),
        };
        (self.id, patch)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    init_logging(&config.logging)?;

    info!("Using storage at {}", config.storage.path.display());
    let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::with_quota(
        &config.storage.path,
        config.storage.quota_bytes,
    ));

    let events = EventBus::new();
    let mut notices = events.subscribe();

    let mut sessions = SessionStore::new(
        storage.clone(),
        Arc::new(StaticCredentials::demo()),
        events.clone(),
    );
    sessions.initialize();

    let mut listings = ListingStore::new(storage, events);
    listings.initialize();

    match cli.command {
        Command::List {
            tag,
            property_type,
            min_price,
            max_price,
            min_bedrooms,
        } => {
            let filter = ListingFilter {
                tag,
                property_type,
                min_price,
                max_price,
                min_bedrooms,
            };
            let mut found = listings.filter(&filter);
            found.sort_by(|a, b| b.published_at.cmp(&a.published_at));

            if found.is_empty() {
                println!("No properties found with the selected filter.");
            }
            for (i, property) in found.iter().enumerate() {
                print_summary(i + 1, property);
            }
        }
        Command::Show { id } => match listings.get(&id) {
            Some(property) => print_detail(property),
            None => println!("Property not found: {}", id),
        },
        Command::Login { email, password } => {
            let session = sessions.login(&email, &password).await?;
            println!("Welcome back, {} ({})", session.display_name, session.role.as_str());
        }
        Command::Logout => {
            sessions.logout();
            println!("Signed out");
        }
        Command::Whoami => match sessions.current() {
            Some(session) => println!(
                "{} <{}> role={}",
                session.display_name,
                session.email,
                session.role.as_str()
            ),
            None => println!("Not signed in"),
        },
        Command::Add(args) => {
            sessions.require_role(UserRole::Admin)?;
            let added = listings.add(args.into()).context("Failed to add property")?;
            println!("Property added: {} ({})", added.title, added.id);
        }
        Command::Update(args) => {
            sessions.require_role(UserRole::Admin)?;
            let (id, patch) = args.into_patch();
            if patch.is_empty() {
                println!("Nothing to update");
            } else if listings.update(&id, patch).context("Failed to update property")? {
                println!("Property updated: {}", id);
            } else {
                println!("Property not found: {}", id);
            }
        }
        Command::Delete { id } => {
            sessions.require_role(UserRole::Admin)?;
            if listings.delete(&id).context("Failed to delete property")? {
                println!("Property deleted: {}", id);
            } else {
                println!("Property not found: {}", id);
            }
        }
        Command::Export { path } => {
            let json = serde_json::to_string_pretty(listings.list())?;
            tokio::fs::write(&path, json)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Saved {} properties to {}", listings.list().len(), path.display());
        }
    }

    report_evictions(&mut notices);
    Ok(())
}

fn report_evictions(notices: &mut broadcast::Receiver<StoreEvent>) {
    while let Ok(event) = notices.try_recv() {
        if let StoreEvent::ListingsEvicted { kept, dropped } = event {
            println!(
                "Storage full: removed {} oldest properties, {} remain",
                dropped, kept
            );
        }
    }
}

fn print_summary(index: usize, property: &Property) {
    println!("{}. {} ({})", index, property.title, format_price(property.price));
    println!(
        "   {} · {} bed, {} bath, {} sq ft",
        property.property_type.as_str(),
        property.bedrooms,
        property.bathrooms,
        property.area
    );
    println!("   {}", property.location);
    if !property.tags.is_empty() {
        let labels: Vec<_> = property.tags.iter().map(|t| t.label()).collect();
        println!("   Tags: {}", labels.join(", "));
    }
    println!("   ID: {}", property.id);
    println!();
}

fn print_detail(property: &Property) {
    println!("{}", property.title);
    println!("{}", format_price(property.price));
    println!("{}", property.location);
    println!();
    println!(
        "{} bedrooms · {} bathrooms · {} sq ft · {}",
        property.bedrooms,
        property.bathrooms,
        property.area,
        property.property_type.as_str()
    );
    if !property.tags.is_empty() {
        let labels: Vec<_> = property.tags.iter().map(|t| t.label()).collect();
        println!("Tags: {}", labels.join(", "));
    }
    if !property.description.is_empty() {
        println!();
        println!("{}", property.description);
    }
    if !property.amenities.is_empty() {
        println!();
        println!("Amenities: {}", property.amenities.join(", "));
    }
    if !property.images.is_empty() {
        println!("Images: {}", property.images.len());
    }
    println!("Listed: {}", property.published_at.format("%d %b %Y"));
}
