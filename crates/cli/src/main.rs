use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{AccountProfile, DataIndex, GenreId, ListEntry, ListKind, MovieId, MovieRecord, UserId};
use rand::seq::IndexedRandom;
use server::{RecommendConfig, RecommendationOrchestrator, Recommendations, Strategy};
use sources::{
    CatalogSource, HistorySource, InMemoryCatalog, InMemoryHistory, ListToggle, NewReview, ReviewBoard, Vote,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// movie-recs - content-based movie recommendations
#[derive(Parser)]
#[command(name = "movie-recs")]
#[command(about = "Movie recommendations from genre, rating and release-year similarity", long_about = None)]
struct Cli {
    /// Directory holding catalog.json and users.json
    #[arg(short, long, default_value = "data/sample")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get movie recommendations (guest list when no user is given)
    Recommend {
        #[arg(long)]
        user_id: Option<UserId>,

        /// Number of recommendations to return
        #[arg(long, default_value = "20")]
        limit: usize,

        /// Popular pages gathered as candidates
        #[arg(long, default_value = "3")]
        pages: u32,

        /// Show the strategy and similarity score
        #[arg(long)]
        explain: bool,
    },

    /// Show the home feed
    Feed {
        #[arg(long)]
        user_id: Option<UserId>,
    },

    /// Search movies by title
    Search {
        #[arg(long)]
        title: String,
    },

    /// Browse a genre, or list genres when no id is given
    Genre {
        #[arg(long)]
        id: Option<GenreId>,

        #[arg(long, default_value = "1")]
        page: u32,
    },

    /// Show one movie
    Movie {
        #[arg(long)]
        id: MovieId,
    },

    /// Show a user's personal lists
    Lists {
        #[arg(long)]
        user_id: UserId,
    },

    /// Add a movie to a list, or remove it if already there
    Toggle {
        #[arg(long)]
        user_id: UserId,

        /// favorites, watched or watch-later
        #[arg(long)]
        list: ListKind,

        #[arg(long)]
        movie_id: MovieId,

        /// Recommend again after the change
        #[arg(long)]
        then_recommend: bool,
    },

    /// Show a user's account profile, or update it when a field is given
    Profile {
        #[arg(long)]
        user_id: UserId,

        /// New display name
        #[arg(long)]
        name: Option<String>,

        /// New avatar URL
        #[arg(long)]
        photo_url: Option<String>,
    },

    /// Post a review, optionally reply to it, and print the movie's threads
    Reviews {
        #[arg(long)]
        movie_id: MovieId,

        #[arg(long)]
        user_id: UserId,

        #[arg(long)]
        text: String,

        /// Reply posted by another user under the new review
        #[arg(long, requires = "reply_by")]
        reply: Option<String>,

        #[arg(long)]
        reply_by: Option<UserId>,

        /// Users that like the new review
        #[arg(long, value_delimiter = ',')]
        liked_by: Vec<UserId>,
    },

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    println!("Loading catalog from {}...", cli.data_dir.display());
    let start = Instant::now();
    let data_index = Arc::new(
        DataIndex::load_from_files(&cli.data_dir).context("Failed to load catalog data")?,
    );
    let (movies, genres, users) = data_index.counts();
    println!(
        "{} Loaded {} movies, {} genres, {} users in {:?}",
        "✓".green(),
        movies,
        genres,
        users,
        start.elapsed()
    );

    let catalog: Arc<dyn CatalogSource> = Arc::new(InMemoryCatalog::new(data_index.clone()));
    let history: Arc<dyn HistorySource> = Arc::new(InMemoryHistory::from_index(&data_index));

    match cli.command {
        Commands::Recommend {
            user_id,
            limit,
            pages,
            explain,
        } => {
            let config = RecommendConfig::default()
                .with_limit(limit)
                .with_candidate_pages(pages);
            let orchestrator = RecommendationOrchestrator::with_config(catalog, history, config);
            handle_recommend(&orchestrator, user_id.as_deref(), explain).await
        }
        Commands::Feed { user_id } => {
            let orchestrator = RecommendationOrchestrator::new(catalog, history);
            handle_feed(&orchestrator, user_id.as_deref()).await
        }
        Commands::Search { title } => handle_search(catalog.as_ref(), &title).await,
        Commands::Genre { id, page } => handle_genre(catalog.as_ref(), id, page).await,
        Commands::Movie { id } => handle_movie(catalog.as_ref(), id).await,
        Commands::Lists { user_id } => handle_lists(history.as_ref(), &user_id).await,
        Commands::Toggle {
            user_id,
            list,
            movie_id,
            then_recommend,
        } => {
            let orchestrator = RecommendationOrchestrator::new(catalog, history);
            handle_toggle(&orchestrator, &user_id, list, movie_id, then_recommend).await
        }
        Commands::Profile {
            user_id,
            name,
            photo_url,
        } => handle_profile(history.as_ref(), &user_id, name, photo_url).await,
        Commands::Reviews {
            movie_id,
            user_id,
            text,
            reply,
            reply_by,
            liked_by,
        } => {
            handle_reviews(
                catalog.as_ref(),
                history.as_ref(),
                movie_id,
                user_id,
                text,
                reply.zip(reply_by),
                &liked_by,
            )
            .await
        }
        Commands::Benchmark {
            requests,
            concurrent,
        } => {
            let orchestrator = RecommendationOrchestrator::new(catalog, history);
            handle_benchmark(&data_index, orchestrator, requests, concurrent).await
        }
    }
}

/// Handle the 'recommend' command
async fn handle_recommend(
    orchestrator: &RecommendationOrchestrator,
    user_id: Option<&str>,
    explain: bool,
) -> Result<()> {
    let recommendations = match user_id {
        Some(user_id) => orchestrator.recommend_detailed(user_id).await,
        None => orchestrator.recommend_guest().await,
    };
    print_recommendations(&recommendations, explain);
    Ok(())
}

/// Handle the 'feed' command
async fn handle_feed(orchestrator: &RecommendationOrchestrator, user_id: Option<&str>) -> Result<()> {
    let feed = orchestrator.home_feed(user_id).await;

    print_row("Top Rated", &feed.top_rated);
    print_row("Upcoming", &feed.upcoming);
    print_row("Now Playing", &feed.now_playing);
    print_row("Recommended For You", &feed.recommended);
    Ok(())
}

/// Handle the 'search' command
async fn handle_search(catalog: &dyn CatalogSource, title: &str) -> Result<()> {
    let matches = catalog.search(title).await?;

    println!("{}", format!("Search results for '{}':", title).bold().blue());
    if matches.is_empty() {
        println!("  (no matches)");
    }
    for movie in matches.iter().take(data_loader::PAGE_SIZE) {
        println!("  {}", describe(movie));
    }
    Ok(())
}

/// Handle the 'genre' command
async fn handle_genre(catalog: &dyn CatalogSource, id: Option<GenreId>, page: u32) -> Result<()> {
    let genres = catalog.genres().await?;

    let Some(id) = id else {
        println!("{}", "Genres:".bold().blue());
        for genre in &genres {
            println!("  {:>5}  {}", genre.id, genre.name);
        }
        return Ok(());
    };

    let name = genres
        .iter()
        .find(|g| g.id == id)
        .map(|g| g.name.clone())
        .ok_or_else(|| anyhow!("Genre {} not found", id))?;

    let listing = catalog.list_by_genre(id, page).await?;
    println!(
        "{}",
        format!("{} (page {} of {}):", name, listing.page, listing.total_pages)
            .bold()
            .blue()
    );
    for movie in &listing.results {
        println!("  {}", describe(movie));
    }
    Ok(())
}

/// Handle the 'movie' command
async fn handle_movie(catalog: &dyn CatalogSource, id: MovieId) -> Result<()> {
    let movie = catalog.get_movie_details(id).await?;
    let genres = catalog.genres().await?;
    let cast = catalog.top_cast(id).await?;

    let genre_names = movie
        .genre_ids
        .iter()
        .map(|gid| {
            genres
                .iter()
                .find(|g| g.id == *gid)
                .map(|g| g.name.clone())
                .unwrap_or_else(|| gid.to_string())
        })
        .collect::<Vec<_>>()
        .join(", ");

    println!("{}", movie.title.bold().blue());
    println!("{}Id: {}", "• ".green(), movie.id);
    println!("{}Released: {}", "• ".green(), movie.release_date.as_deref().unwrap_or("unknown"));
    println!("{}Genres: {}", "• ".green(), genre_names);
    if !cast.is_empty() {
        let names = cast
            .iter()
            .map(|member| member.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        println!("{}Cast: {}", "• ".green(), names);
    }
    match movie.vote_average {
        Some(vote) => println!("{}Rating: {:.1}", "• ".cyan(), vote),
        None => println!("{}Rating: n/a", "• ".cyan()),
    }
    if let Some(overview) = &movie.overview {
        println!("\n{}", overview);
    }
    Ok(())
}

/// Handle the 'lists' command
async fn handle_lists(history: &dyn HistorySource, user_id: &str) -> Result<()> {
    println!("{}", format!("Lists for {}:", user_id).bold().blue());
    for kind in ListKind::ALL {
        let entries = history.list(user_id, kind).await?;
        println!("{} ({})", kind.to_string().green(), entries.len());
        for entry in &entries {
            println!(
                "  - {} {}",
                entry.movie_id,
                entry.title.as_deref().unwrap_or("")
            );
        }
    }
    Ok(())
}

/// Handle the 'toggle' command
async fn handle_toggle(
    orchestrator: &RecommendationOrchestrator,
    user_id: &str,
    kind: ListKind,
    movie_id: MovieId,
    then_recommend: bool,
) -> Result<()> {
    let movie = orchestrator
        .catalog()
        .get_movie_details(movie_id)
        .await
        .with_context(|| format!("Movie {} not found", movie_id))?;

    let outcome = orchestrator
        .history()
        .toggle(user_id, kind, ListEntry::from_movie(&movie))
        .await?;
    match outcome {
        ListToggle::Added => println!("{} Added '{}' to {}", "✓".green(), movie.title, kind),
        ListToggle::Removed => println!("{} Removed '{}' from {}", "✓".yellow(), movie.title, kind),
    }

    if then_recommend {
        handle_recommend(orchestrator, Some(user_id), false).await?;
    }
    Ok(())
}

/// Handle the 'profile' command
async fn handle_profile(
    history: &dyn HistorySource,
    user_id: &str,
    name: Option<String>,
    photo_url: Option<String>,
) -> Result<()> {
    if name.is_some() || photo_url.is_some() {
        // Saving replaces the whole profile; unspecified fields keep their value.
        let current = history.get_profile(user_id).await?.unwrap_or_default();
        let updated = AccountProfile::new(
            name.or(current.display_name),
            photo_url.or(current.photo_url),
        );
        history.update_profile(user_id, updated).await?;
        println!("{} Profile saved", "✓".green());
    }

    let profile = history.get_profile(user_id).await?.unwrap_or_default();
    println!("{}", format!("Profile for {}:", user_id).bold().blue());
    println!("{}Name: {}", "• ".green(), profile.display_name_or_anon());
    println!(
        "{}Photo: {}",
        "• ".green(),
        profile.photo_url.as_deref().unwrap_or("none")
    );
    Ok(())
}

/// Handle the 'reviews' command
async fn handle_reviews(
    catalog: &dyn CatalogSource,
    history: &dyn HistorySource,
    movie_id: MovieId,
    user_id: UserId,
    text: String,
    reply: Option<(String, UserId)>,
    liked_by: &[UserId],
) -> Result<()> {
    let movie = catalog.get_movie_details(movie_id).await?;
    let board = ReviewBoard::new();

    let review = board.add_review(NewReview {
        movie_id,
        movie_title: Some(movie.title.clone()),
        user_id,
        text,
        reply_to: None,
    })?;

    if let Some((reply_text, reply_user)) = reply {
        board.add_review(NewReview {
            movie_id,
            movie_title: Some(movie.title.clone()),
            user_id: reply_user,
            text: reply_text,
            reply_to: Some(review.id),
        })?;
    }
    for voter in liked_by {
        board.vote(review.id, voter, Vote::Like)?;
    }

    println!("{}", format!("Reviews for {}:", movie.title).bold().blue());
    for thread in board.threads_with_authors(movie_id, history).await? {
        println!(
            "{} {}: {} [{} {}]",
            "•".green(),
            thread.review.author.name.bold(),
            thread.review.text,
            format!("+{}", thread.review.likes).green(),
            format!("-{}", thread.review.dislikes).red()
        );
        for reply in &thread.replies {
            println!("    ↳ {}: {}", reply.author.name.bold(), reply.text);
        }
    }
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    data_index: &DataIndex,
    orchestrator: RecommendationOrchestrator,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    if requests == 0 {
        bail!("Benchmark needs at least one request");
    }

    // Known users plus one id with no history, so both paths get exercised.
    let mut pool: Vec<UserId> = data_index.user_ids().into_iter().cloned().collect();
    pool.push("guest".to_string());

    let user_ids: Vec<UserId> = {
        let mut rng = rand::rng();
        (0..requests)
            .filter_map(|_| pool.choose(&mut rng).cloned())
            .collect()
    };

    info!(
        "Running {} requests, {} at a time, over {} users",
        requests,
        concurrent.max(1),
        pool.len()
    );

    let wall_clock = Instant::now();
    let mut timings: Vec<Duration> = Vec::with_capacity(requests);
    let mut personalized = 0usize;

    for batch in user_ids.chunks(concurrent.max(1)) {
        let mut handles = Vec::with_capacity(batch.len());
        for user in batch {
            let orchestrator = orchestrator.clone();
            let user = user.clone();
            handles.push(tokio::spawn(async move {
                let start = Instant::now();
                let result = orchestrator.recommend_detailed(&user).await;
                (start.elapsed(), result.strategy)
            }));
        }
        for handle in handles {
            let (elapsed, strategy) = handle.await?;
            timings.push(elapsed);
            if strategy == Strategy::Personalized {
                personalized += 1;
            }
        }
    }
    let total_time = wall_clock.elapsed();

    timings.sort();
    let percentile = |p: f64| timings[((timings.len() as f64 * p) as usize).min(timings.len() - 1)];
    let avg_latency = timings.iter().sum::<Duration>() / timings.len() as u32;
    let throughput = timings.len() as f64 / total_time.as_secs_f64();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Requests: {} ({} personalized)", timings.len(), personalized);
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

/// One-line movie summary: id, title, year and rating
fn describe(movie: &MovieRecord) -> String {
    let rating = movie
        .vote_average
        .map(|v| format!("{:.1}", v))
        .unwrap_or_else(|| "n/a".to_string());
    format!(
        "{:>7}  {} ({}) ★ {}",
        movie.id,
        movie.title,
        movie
            .release_date
            .as_deref()
            .and_then(data_loader::parse_release_year)
            .map(|y| y.to_string())
            .unwrap_or_else(|| "?".to_string()),
        rating
    )
}

fn print_row(title: &str, movies: &[MovieRecord]) {
    println!("{}", title.bold().blue());
    if movies.is_empty() {
        println!("  (nothing to show)");
    }
    for movie in movies {
        println!("  {}", describe(movie));
    }
}

fn print_recommendations(recommendations: &Recommendations, explain: bool) {
    let header = match recommendations.strategy {
        Strategy::Personalized => "Recommended for you:",
        Strategy::Guest => "Popular right now:",
    };
    println!("{}", header.bold().blue());
    if recommendations.items.is_empty() {
        println!("  (no recommendations available)");
    }

    for (rank, item) in recommendations.items.iter().enumerate() {
        print!("{}. {}", (rank + 1).to_string().green(), describe(&item.movie));
        match (explain, item.score) {
            (true, Some(score)) => println!(" - similarity {:.4}", score),
            (true, None) => println!(" - popular, unscored"),
            (false, _) => println!(),
        }
    }
}
