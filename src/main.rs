// Command line front end for the hotel booking client

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tokio::sync::oneshot;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hotel_booking_client::booking::Field;
use hotel_booking_client::{
    CacheConfig, CachedHotelApi, ClientConfig, DetailPage, DetailView, FilterChange, GuestCount,
    HotelApi, HttpHotelApi, ListingPage, ListingView, Route, RoomType, SubmissionState,
};

#[derive(Parser)]
#[command(name = "hotel-booking")]
#[command(author, version, about = "Browse hotels and book a stay", long_about = None)]
struct Cli {
    /// Backend base URL (defaults to HOTEL_API_BASE_URL or http://localhost:3000)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Request timeout in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List hotels, optionally filtered
    List(ListArgs),

    /// Show a single hotel
    Show {
        /// Hotel id
        id: u64,
    },

    /// Book a stay at a hotel
    Book(BookArgs),
}

#[derive(Args)]
struct ListArgs {
    /// Case-insensitive match on name or location
    #[arg(long, default_value = "")]
    search: String,

    /// Price range such as 0-100, 101-200 or 201+
    #[arg(long)]
    price: Option<String>,

    /// Minimum rating such as 4.5+, 4+ or 3+
    #[arg(long)]
    rating: Option<String>,
}

#[derive(Args)]
struct BookArgs {
    /// Hotel id
    id: u64,

    #[arg(long)]
    first_name: String,

    #[arg(long)]
    last_name: String,

    #[arg(long)]
    email: String,

    #[arg(long)]
    phone: String,

    /// Check-in date (YYYY-MM-DD)
    #[arg(long)]
    check_in: NaiveDate,

    /// Check-out date (YYYY-MM-DD)
    #[arg(long)]
    check_out: NaiveDate,

    /// Number of guests (1-4)
    #[arg(long, default_value_t = 1)]
    guests: u8,

    /// standard, deluxe or suite
    #[arg(long, default_value = "standard")]
    room_type: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env().context("invalid client configuration")?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.timeout_ms = timeout_ms;
    }
    info!(base_url = %config.base_url, "using backend");

    let api = CachedHotelApi::new(
        HttpHotelApi::new(config).context("failed to build http client")?,
        CacheConfig::default(),
    );

    match cli.command {
        Commands::List(args) => list(&api, args).await,
        Commands::Show { id } => show(&api, id).await,
        Commands::Book(args) => book(&api, args).await,
    }
}

async fn list<A: HotelApi>(api: &A, args: ListArgs) -> Result<()> {
    let mut page = ListingPage::new();
    page.load(api).await;

    page.on_filter_change(FilterChange::parse("search", &args.search)?);
    if let Some(price) = args.price {
        page.on_filter_change(FilterChange::parse("priceRange", &price)?);
    }
    if let Some(rating) = args.rating {
        page.on_filter_change(FilterChange::parse("rating", &rating)?);
    }

    match page.view() {
        ListingView::Loading | ListingView::Unavailable => bail!("hotels could not be loaded"),
        ListingView::Empty => println!("No hotels found matching your criteria"),
        ListingView::Hotels(hotels) => {
            for hotel in hotels {
                println!(
                    "{:>4}  {:<30} {:<28} ${:>7.2}/night  {:.1}*  {} rooms  {}",
                    hotel.id,
                    hotel.name,
                    hotel.location,
                    hotel.price_per_night,
                    hotel.rating,
                    hotel.available_rooms,
                    Route::HotelDetail(hotel.id)
                );
            }
        }
    }
    Ok(())
}

async fn show<A: HotelApi>(api: &A, id: u64) -> Result<()> {
    let mut page = DetailPage::new(id);
    page.load(api).await;

    let DetailView::Ready(hotel) = page.view() else {
        bail!("hotel {} could not be loaded", id);
    };
    println!("{}", hotel.name);
    println!("  Location: {}", hotel.location);
    println!("  Rating:   {} / 5.0", hotel.rating);
    println!("  Rooms:    {} available", hotel.available_rooms);
    println!("  Price:    ${}/night", hotel.price_per_night);
    Ok(())
}

async fn book<A: HotelApi>(api: &A, args: BookArgs) -> Result<()> {
    let mut page = DetailPage::new(args.id);
    page.load(api).await;
    let Some(wizard) = page.wizard_mut() else {
        bail!("hotel {} could not be loaded", args.id);
    };

    let guest = &mut wizard.draft_mut().guest;
    guest.first_name = args.first_name;
    guest.last_name = args.last_name;
    guest.email = args.email;
    guest.phone = args.phone;
    if !wizard.next_step() {
        report_errors(wizard.errors().iter().map(|e| (e.field, e.message)));
        bail!("guest details are invalid");
    }

    let stay = &mut wizard.draft_mut().stay;
    stay.check_in = Some(args.check_in);
    stay.check_out = Some(args.check_out);
    stay.guests = GuestCount::new(args.guests)?;
    stay.room_type = args.room_type.parse::<RoomType>()?;
    println!("Total price: ${:.2}", wizard.total_price());

    let (done_tx, done_rx) = oneshot::channel();
    let state = wizard
        .submit(api, move || {
            let _ = done_tx.send(Route::Listing);
        })
        .await;

    match state {
        SubmissionState::Success(booking) => {
            println!(
                "Booking Successful! Reservation {} at {} for {} confirmed.",
                booking.id, booking.hotel_name, booking.guest_name
            );
            let route = done_rx.await.context("completion callback dropped")?;
            println!("Returning to {}", route);
            Ok(())
        }
        SubmissionState::Error(message) => bail!(message),
        SubmissionState::Idle | SubmissionState::Pending => {
            report_errors(wizard.errors().iter().map(|e| (e.field, e.message)));
            bail!("booking details are invalid")
        }
    }
}

fn report_errors<'a>(errors: impl Iterator<Item = (Field, &'a str)>) {
    for (field, message) in errors {
        eprintln!("  {:?}: {}", field, message);
    }
}
