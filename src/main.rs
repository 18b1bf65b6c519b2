//! om38to13 CLI entry point
//!
//! Explains HG38 regions in CHM13-T2T coordinates and annotates Bionano
//! SMAP calls with the structural differences between the assemblies.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use om38to13::config::{DataLayout, DatasetVariant, DEFAULT_DATA_DIR};
use om38to13::core::{parse_query, Classifier, DatasetLoader, Datasets, ReverseTables};
use om38to13::formats::{self, smap::Smap, tables};
use om38to13::report::Renderer;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Dataset variant (CLI enum)
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum DatasetArg {
    /// Alignments and assemblies combined
    #[value(name = "all")]
    All,
    /// Alignments only
    #[default]
    #[value(name = "alignments")]
    Alignments,
    /// Assemblies only
    #[value(name = "assemblies")]
    Assemblies,
}

impl From<DatasetArg> for DatasetVariant {
    fn from(arg: DatasetArg) -> Self {
        match arg {
            DatasetArg::All => DatasetVariant::AllData,
            DatasetArg::Alignments => DatasetVariant::JustAlignments,
            DatasetArg::Assemblies => DatasetVariant::JustAssemblies,
        }
    }
}

#[derive(Parser)]
#[command(name = "om38to13")]
#[command(about = "Explain how HG38 regions and SV calls look in CHM13-T2T")]
#[command(version)]
struct Cli {
    /// Directory with the mapping and annotation tables
    #[arg(short = 'w', long = "data-dir", global = true, default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Which mapping tables to use
    #[arg(long = "dataset", global = true, default_value = "alignments")]
    dataset: DatasetArg,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the mapping report of one region (e.g. chr1:10000-20000)
    View {
        /// HG38 region or position
        region: String,
    },
    /// Annotate every call of an SMAP file
    Annotate {
        /// Input SMAP file
        input: PathBuf,
        /// Output file (default: <input>.annotated.txt)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
        /// Window around translocation breakpoints
        #[arg(short = 'd', long, default_value_t = formats::DEFAULT_DISTANCE)]
        distance: f64,
        /// Number of threads
        #[arg(short = 't', long, default_value = "1")]
        threads: usize,
    },
    /// Keep only SMAP calls that overlap no known assembly difference
    Filter {
        /// Input SMAP file
        input: PathBuf,
        /// Output file (default: <input>.filtered.smap)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
        /// Window around translocation breakpoints
        #[arg(short = 'd', long, default_value_t = formats::DEFAULT_DISTANCE)]
        distance: f64,
    },
    /// Derive the reverse gap and ambiguity tables from the reverse mapping table
    Prepare,
}

fn load_datasets(layout: &DataLayout) -> anyhow::Result<Datasets> {
    let start = Instant::now();
    eprintln!("Loading {:?} tables from {:?}", layout.variant, layout.data_dir());

    let datasets = layout
        .load()
        .with_context(|| format!("Failed to load datasets from {:?}", layout.data_dir()))?;

    eprintln!("Datasets loaded in {:.2}s", start.elapsed().as_secs_f64());
    Ok(datasets)
}

fn create_output(path: &Path) -> anyhow::Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    Ok(BufWriter::new(file))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let start = Instant::now();
    let layout = DataLayout::new(cli.data_dir, cli.dataset.into());

    match cli.command {
        Commands::View { region } => {
            let query = parse_query(&region).with_context(|| format!("Invalid region '{}'", region))?;
            let datasets = load_datasets(&layout)?;
            let report = Classifier::new(&datasets).classify(&query)?;

            let stdout = io::stdout();
            let mut out = stdout.lock();
            writeln!(out, "Position: {}", query)?;
            Renderer::new().with_legend(true).write_report(&mut out, &report)?;
        }

        Commands::Annotate { input, output, distance, threads } => {
            let output_path = output.unwrap_or_else(|| input.with_extension("annotated.txt"));
            let smap = Smap::from_file(&input, distance)
                .with_context(|| format!("Failed to read SMAP file {:?}", input))?;
            let datasets = load_datasets(&layout)?;

            eprintln!("Annotating SMAP file: {:?} -> {:?}", input, output_path);
            let mut writer = create_output(&output_path)?;
            let stats = formats::annotate_smap(&smap, &Classifier::new(&datasets), &mut writer, threads)?;
            writer.flush()?;

            eprintln!("\n=== Annotation Statistics ===");
            eprintln!("Common calls:    {}", stats.common);
            eprintln!("Translocations:  {}", stats.translocations);
            eprintln!("Inversions:      {}", stats.inversions);
            eprintln!("Annotated:       {}", stats.annotated);
            eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
        }

        Commands::Filter { input, output, distance } => {
            let output_path = output.unwrap_or_else(|| input.with_extension("filtered.smap"));
            let smap = Smap::from_file(&input, distance)
                .with_context(|| format!("Failed to read SMAP file {:?}", input))?;
            let datasets = load_datasets(&layout)?;

            eprintln!("Filtering SMAP file: {:?} -> {:?}", input, output_path);
            let kept = formats::filter_smap(&smap, &Classifier::new(&datasets))?;
            let mut writer = create_output(&output_path)?;
            smap.write_selected(&mut writer, &kept)?;
            writer.flush()?;

            eprintln!("\n=== Filter Statistics ===");
            eprintln!("Total records:   {}", smap.original.len());
            eprintln!("Kept:            {}", kept.len());
            eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
        }

        Commands::Prepare => {
            let reverse_path = layout.reverse_table();
            eprintln!("Deriving reverse tables from {:?}", reverse_path);
            let entries = tables::load_mapping_entries(&reverse_path)?;
            let derived = ReverseTables::derive(&entries)?;
            tables::write_reverse_tables(&layout.reverse_gaps(), &layout.reverse_ambiguities(), &derived)
                .context("Failed to write reverse tables")?;

            eprintln!("\n=== Prepare Statistics ===");
            eprintln!("Reverse entries: {}", entries.len());
            eprintln!("Gaps:            {}", derived.gaps.len());
            eprintln!("Ambiguities:     {}", derived.ambiguities.len());
            eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
        }
    }

    Ok(())
}
