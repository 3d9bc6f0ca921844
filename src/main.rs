use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use job_publisher::ai::extract::LlmExtractor;
use job_publisher::bot::{self, BotContext, HttpMessenger};
use job_publisher::config::BotConfig;
use job_publisher::{diagnostics, pipeline, BloggerStore, ContentGenerator, JobFields, PostStore};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

#[derive(Parser)]
#[command(name = "publisher")]
#[command(about = "Generate SEO job articles with AI and publish them to Blogger")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Optional posting details shared by `publish` and `edit`.
#[derive(Args)]
struct DetailFlags {
    /// Application URL shown in the article
    #[arg(long = "link", visible_alias = "apply-link")]
    link: Option<String>,

    /// Application email shown in the article
    #[arg(long = "email", visible_alias = "apply-email")]
    email: Option<String>,

    /// Walk-in interview date
    #[arg(long)]
    date: Option<String>,

    /// Walk-in interview time
    #[arg(long)]
    time: Option<String>,

    /// Walk-in interview venue
    #[arg(long = "venue", visible_alias = "interview-location")]
    venue: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Generate an article and create it on the blog (draft by default)
    Publish {
        title: String,
        location: String,
        requirements: String,
        company: Option<String>,
        salary: Option<String>,

        /// Publish immediately instead of drafting
        #[arg(long)]
        publish: bool,

        /// Comma-separated post labels
        #[arg(long, value_delimiter = ',')]
        labels: Vec<String>,

        #[command(flatten)]
        details: DetailFlags,
    },
    /// Regenerate content for an existing post, keeping its current title
    Edit {
        post_id: String,
        title: String,
        location: String,
        requirements: String,
        company: Option<String>,
        salary: Option<String>,

        #[command(flatten)]
        details: DetailFlags,
    },
    /// List recent posts
    List {
        /// How many posts to fetch
        max_results: Option<usize>,
    },
    /// Delete a post by id
    Delete { post_id: String },
    /// Run one publish pipeline per entry of a JSON batch file
    Batch {
        file: PathBuf,

        /// Publish entries immediately instead of drafting
        #[arg(long)]
        publish: bool,
    },
    /// Run the chat bridge and its status web server
    Bot,
    /// Validate the Gemini API key and probe the content models
    CheckKey,
}

fn job_from_args(
    title: String,
    location: String,
    requirements: String,
    company: Option<String>,
    salary: Option<String>,
    labels: Vec<String>,
    details: DetailFlags,
) -> JobFields {
    JobFields {
        title: Some(title),
        location: Some(location),
        requirements: Some(requirements),
        company,
        salary,
        job_type: None,
        apply_link: details.link,
        apply_email: details.email,
        interview_date: details.date,
        interview_time: details.time,
        interview_location: details.venue,
        labels,
    }
}

async fn handle_publish(job: JobFields, publish_now: bool) -> Result<()> {
    println!(
        "🚀 Generating content for: {} in {}...",
        job.title.as_deref().unwrap_or_default(),
        job.location.as_deref().unwrap_or_default()
    );

    let generator = ContentGenerator::new();
    let store = BloggerStore::from_env()?;

    println!(
        "{}",
        if publish_now {
            "📝 Publishing to Blogger..."
        } else {
            "📝 Drafting to Blogger..."
        }
    );
    let post = pipeline::publish(&generator, &store, &job, publish_now).await?;

    println!(
        "🎉 Post {} successfully!",
        if publish_now { "published" } else { "drafted" }
    );
    println!("🔗 ID: {}", post.id);
    println!("🔗 URL: {}", post.url_or_dash());
    Ok(())
}

async fn handle_edit(post_id: &str, job: JobFields) -> Result<()> {
    println!("🔍 Fetching post {}...", post_id);

    let generator = ContentGenerator::new();
    let store = BloggerStore::from_env()?;

    let updated = pipeline::edit(&generator, &store, post_id, &job).await?;

    println!("🎉 Post updated successfully!");
    println!("🔗 URL: {}", updated.url_or_dash());
    Ok(())
}

async fn handle_list(max_results: usize) -> Result<()> {
    println!("🔍 Listing last {} posts...", max_results);

    let store = BloggerStore::from_env()?;
    let posts = store.list(max_results).await?;

    if posts.is_empty() {
        println!("No posts found.");
        return Ok(());
    }

    println!("{:<22} {:<45} {:<10} {:<25}", "ID", "Title", "Status", "Published");
    println!("{}", "-".repeat(104));
    for post in posts {
        println!(
            "{:<22} {:<45} {:<10} {:<25}",
            post.id,
            post.title,
            post.status_or_dash(),
            post.published.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

async fn handle_delete(post_id: &str) -> Result<()> {
    println!("🗑️ Deleting post {}...", post_id);

    let store = BloggerStore::from_env()?;
    store.delete(post_id).await?;

    println!("✅ Post deleted successfully.");
    Ok(())
}

async fn handle_batch(file: &PathBuf, publish_now: bool) -> Result<()> {
    println!("📦 Starting batch process from {}...", file.display());

    let content = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read batch file: {}", file.display()))?;
    let jobs: Vec<JobFields> = serde_json::from_str(&content)
        .context("Batch file must contain a JSON array of job objects")?;

    println!("📋 Found {} jobs to process.", jobs.len());

    let generator = ContentGenerator::new();
    let store = BloggerStore::from_env()?;

    let report = pipeline::run_batch(&generator, &store, &jobs, publish_now).await;

    println!("\n✅ Batch process completed!");
    println!("   Succeeded: {}/{}", report.succeeded, report.total);
    if !report.failures.is_empty() {
        println!("   Failed:");
        for failure in &report.failures {
            println!(
                "   [{}] {}: {}",
                failure.index + 1,
                failure.title,
                failure.error
            );
        }
    }
    Ok(())
}

async fn handle_bot() -> Result<()> {
    let config = BotConfig::from_env()?;
    let store: Arc<dyn PostStore> = Arc::new(BloggerStore::from_env()?);

    let ctx = BotContext {
        extractor: Arc::new(LlmExtractor),
        generator: Arc::new(ContentGenerator::new()),
        store,
        messenger: Arc::new(HttpMessenger::new(config.outbound_url.clone())?),
    };

    println!("🏁 Starting chat bridge on port {}...", config.port);
    bot::run(ctx, config).await
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    Registry::default()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or(EnvFilter::new("job_publisher=info,publisher=info")),
        )
        .init();

    let cli = Cli::parse();

    // Pipeline failures are reported, never escalated: the process still
    // exits 0 so batch tooling and chat hosting keep running around it.
    match cli.command {
        Command::Publish {
            title,
            location,
            requirements,
            company,
            salary,
            publish,
            labels,
            details,
        } => {
            let job = job_from_args(title, location, requirements, company, salary, labels, details);
            if let Err(err) = handle_publish(job, publish).await {
                eprintln!("❌ Failed to publish: {:#}", err);
            }
        }
        Command::Edit {
            post_id,
            title,
            location,
            requirements,
            company,
            salary,
            details,
        } => {
            let job = job_from_args(
                title,
                location,
                requirements,
                company,
                salary,
                Vec::new(),
                details,
            );
            if let Err(err) = handle_edit(&post_id, job).await {
                eprintln!("❌ Failed to edit: {:#}", err);
            }
        }
        Command::List { max_results } => {
            if let Err(err) = handle_list(max_results.unwrap_or(10)).await {
                eprintln!("❌ Failed to list posts: {:#}", err);
            }
        }
        Command::Delete { post_id } => {
            if let Err(err) = handle_delete(&post_id).await {
                eprintln!("❌ Failed to delete post: {:#}", err);
            }
        }
        Command::Batch { file, publish } => {
            if let Err(err) = handle_batch(&file, publish).await {
                eprintln!("❌ Failed batch process: {:#}", err);
            }
        }
        Command::Bot => {
            if let Err(err) = handle_bot().await {
                eprintln!("❌ Bot stopped: {:#}", err);
            }
        }
        Command::CheckKey => diagnostics::check_gemini_key().await?,
    }

    Ok(())
}
