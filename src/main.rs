// EMC JobGen Main Entry Point
// Copyright (c) 2026 Xing_The_Creator | SYNOID

use emc_jobgen::codec::CodecFamily;
use emc_jobgen::config::Settings;
use emc_jobgen::generator::RenditionMatrixGenerator;
use emc_jobgen::io_shield::ShadowFileWriter;
use emc_jobgen::ladder::ResolutionTier;
use emc_jobgen::profile::{Profile, ProfileCatalog};
use emc_jobgen::report::print_report;
use emc_jobgen::runner::{JobRunner, JobSpec};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::path::PathBuf;
use tracing::{error, info};

const DEFAULT_PROFILE: &str = "poc-4k";

#[derive(Parser)]
#[command(name = "emc-jobgen")]
#[command(about = "MediaConvert job document generator", long_about = None)]
struct Cli {
    /// Settings file (flat JSON); environment variables override it
    #[arg(long, global = true, default_value = "env.json")]
    config: PathBuf,

    /// Profile to generate with (see `profiles`)
    #[arg(short, long, global = true)]
    profile: Option<String>,

    /// Extra profile definition (JSON)
    #[arg(long, global = true)]
    profile_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate and write job documents
    Generate {
        /// Job list (JSON array of { job_name, codecs, profile?, tiers? })
        #[arg(short, long)]
        jobs: Option<PathBuf>,

        /// Job name template for a single job ({codecs}, {formatted_datetime})
        #[arg(short, long, default_value = "Tst4k_{codecs}_{formatted_datetime}")]
        name: String,

        /// Codecs for a single job, in preference order (e.g. HEVC,AVC)
        #[arg(short, long, value_delimiter = ',')]
        codecs: Vec<CodecFamily>,

        /// Tiers for a single job, in preference order (e.g. 720,1080)
        #[arg(short, long, value_delimiter = ',')]
        tiers: Vec<ResolutionTier>,

        /// Output directory for the documents
        #[arg(short, long, default_value = "static")]
        out_dir: PathBuf,
    },

    /// Print the bitrate ladder without writing anything
    Ladder {
        #[arg(short, long, value_delimiter = ',')]
        codecs: Vec<CodecFamily>,

        #[arg(short, long, value_delimiter = ',')]
        tiers: Vec<ResolutionTier>,
    },

    /// List available profiles
    Profiles,
}

fn load_catalog(cli: &Cli) -> anyhow::Result<(ProfileCatalog, String)> {
    let mut catalog = ProfileCatalog::default();
    let mut default_profile = DEFAULT_PROFILE.to_string();

    if let Some(path) = &cli.profile_file {
        let loaded = Profile::load(path)?;
        default_profile = loaded.name.clone();
        catalog = catalog.with_profile(loaded);
    }
    if let Some(name) = &cli.profile {
        default_profile = name.clone();
    }

    // fail on an unknown name before doing any work
    catalog.get(&default_profile)?;
    Ok((catalog, default_profile))
}

fn or_profile<T: Clone>(requested: &[T], fallback: &[T]) -> Vec<T> {
    if requested.is_empty() {
        fallback.to_vec()
    } else {
        requested.to_vec()
    }
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let (catalog, default_profile) = load_catalog(&cli)?;

    match &cli.command {
        Commands::Generate {
            jobs,
            name,
            codecs,
            tiers,
            out_dir,
        } => {
            info!("--- EMC JOBGEN v{} ---", env!("CARGO_PKG_VERSION"));
            let settings = Settings::discover(&cli.config)
                .with_context(|| format!("loading settings (config {:?})", cli.config))?;

            let specs = match jobs {
                Some(path) => JobSpec::load_list(path)?,
                None => {
                    let mut spec = JobSpec::new(name.clone(), codecs.clone());
                    if !tiers.is_empty() {
                        spec.tiers = Some(tiers.clone());
                    }
                    vec![spec]
                }
            };

            let writer = ShadowFileWriter::new(out_dir.clone());
            info!("Writing job documents to {:?}", writer.out_dir());
            let runner = JobRunner::new(&settings, &catalog, &writer, default_profile);

            let mut failed = 0;
            for result in runner.run_all(&specs) {
                match result {
                    Ok(report) => {
                        print_report(&report.job_name, &report.renditions);
                        println!(
                            "{} ({} outputs, sha256 {})",
                            report.path.display(),
                            report.output_count,
                            report.digest
                        );
                    }
                    Err(e) => {
                        error!("{:#}", anyhow::Error::new(e));
                        failed += 1;
                    }
                }
            }

            if failed > 0 {
                bail!("{} of {} job(s) failed", failed, specs.len());
            }
        }

        Commands::Ladder { codecs, tiers } => {
            let profile = catalog.get(&default_profile)?;
            let generator = RenditionMatrixGenerator::new(profile, None);
            let renditions = generator.generate(
                &or_profile(codecs, &profile.codecs),
                &or_profile(tiers, &profile.tiers),
            )?;
            print_report(&profile.name, &renditions);
        }

        Commands::Profiles => {
            for name in catalog.names() {
                let profile = catalog.get(name)?;
                let tiers: Vec<String> = profile.tiers.iter().map(|t| t.to_string()).collect();
                let codecs: Vec<&str> = profile.codecs.iter().map(|c| c.name()).collect();
                println!("{}\t{:?}", profile.name, profile.order);
                println!("  {}", profile.description);
                println!("  codecs: {}", codecs.join(", "));
                println!("  tiers:  {}", tiers.join(", "));
            }
        }
    }

    Ok(())
}
