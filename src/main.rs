//! Conv1D GAN training entry point
//!
//! CLI for training the GAN on a named expression dataset and writing
//! final real/fake visualizations.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tch::{Kind, Tensor};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use exprgan::data::{load_matrix, ExpressionDataset};
use exprgan::model::{DiscriminatorConfig, Gan, GeneratorConfig};
use exprgan::training::{metrics_path, Trainer, TrainerConfig};
use exprgan::utils::{ensure_config_exists, format_elapsed, Config};
use exprgan::viz;

/// Conv1D GAN for synthetic gene-expression vectors
#[derive(Parser)]
#[command(name = "exprgan")]
#[command(version = "0.1.0")]
#[command(about = "Train a GAN that synthesizes gene-expression feature vectors")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.json")]
    config: String,

    /// Verbosity level
    #[arg(short, long, default_value = "info")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a default configuration file
    Init {
        /// Output configuration file path
        #[arg(short, long, default_value = "config.json")]
        output: String,
    },

    /// Train the GAN on a named dataset
    Train {
        /// Dataset name; the matrix is read from `<data_dir>/<dataset>.csv`
        #[arg(short, long)]
        dataset: Option<String>,

        /// Number of training iterations
        #[arg(short, long)]
        steps: Option<usize>,

        /// Batch size
        #[arg(short, long)]
        batch_size: Option<i64>,

        /// Visualization checkpoint interval (0 disables checkpoints)
        #[arg(long)]
        save_interval: Option<usize>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbosity.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Init { output } => {
            let config = ensure_config_exists(&output)?;
            info!("Wrote default configuration to {}", output);
            info!("Dataset: {}, train_steps: {}", config.data.dataset, config.training.train_steps);
        }
        Commands::Train {
            dataset,
            steps,
            batch_size,
            save_interval,
        } => {
            let mut config = if Path::new(&cli.config).exists() {
                Config::load(&cli.config)?
            } else {
                info!("Config file not found, using defaults");
                Config::default()
            };

            if let Some(dataset) = dataset {
                config.data.dataset = dataset;
            }
            if let Some(steps) = steps {
                config.training.train_steps = steps;
            }
            if let Some(batch_size) = batch_size {
                config.training.batch_size = batch_size;
            }
            if let Some(save_interval) = save_interval {
                config.training.save_interval = save_interval;
            }

            train(&config)?;
        }
    }

    Ok(())
}

fn train(config: &Config) -> Result<()> {
    config.validate()?;

    let device = config.get_device();
    info!("Using device: {:?}", device);

    let matrix_path = Path::new(&config.data.data_dir).join(format!("{}.csv", config.data.dataset));
    info!("Loading expression matrix {}", matrix_path.display());
    let raw = load_matrix(&matrix_path)?;
    let dataset = ExpressionDataset::from_matrix(&raw)?;
    info!(
        "Loaded {} samples, raw length {} padded to {}",
        dataset.len(),
        dataset.raw_length(),
        dataset.img_rows()
    );

    let gen_config = GeneratorConfig {
        latent_dim: config.model.latent_dim,
        sample_length: dataset.img_rows() as i64,
        depth: config.model.gen_depth,
        dropout: config.model.dropout,
    };
    let disc_config = DiscriminatorConfig {
        sample_length: dataset.img_rows() as i64,
        depth: config.model.disc_depth,
        dropout: config.model.dropout,
    };
    let gan = Gan::new(gen_config, disc_config, device)?;

    let output_dir = PathBuf::from(&config.training.output_dir);
    let trainer_config = TrainerConfig {
        train_steps: config.training.train_steps,
        batch_size: config.training.batch_size,
        save_interval: config.training.save_interval,
        disc_lr: config.training.disc_lr,
        disc_decay: config.training.disc_decay,
        adv_lr: config.training.adv_lr,
        adv_decay: config.training.adv_decay,
        output_dir: output_dir.clone(),
        dataset_name: config.data.dataset.clone(),
    };
    let mut trainer = Trainer::new(gan, trainer_config)?;

    let start = Instant::now();
    trainer.train(&dataset)?;
    info!("Elapsed: {}", format_elapsed(start.elapsed()));

    std::fs::create_dir_all(&output_dir)?;
    trainer.metrics().save_csv(&metrics_path(&output_dir))?;

    if let Some(latest) = trainer.metrics().latest() {
        info!(
            "Training complete. Final G_loss: {:.4}, D_loss: {:.4}",
            latest.gen_loss, latest.disc_loss
        );
    }

    // Final visualizations: fresh fakes and a random slice of real data
    let fake = trainer.gan().generate(16);
    viz::render_samples(&fake, &viz::fake_path(&output_dir, &config.data.dataset, None))?;

    let x_train = dataset.to_tensor(tch::Device::Cpu);
    let count = 16.min(dataset.len() as i64);
    let indices = Tensor::randint(dataset.len() as i64, [count], (Kind::Int64, tch::Device::Cpu));
    let real = x_train.index_select(0, &indices);
    viz::render_samples(&real, &viz::real_path(&output_dir, &config.data.dataset))?;

    info!("Wrote visualizations to {}", output_dir.display());
    Ok(())
}
