//! Compiles zoneinfo source files into zone rules.
//!
//! ```text
//! zoneinfo-compile --input tzdata compile --version 2025b --output rules.json
//! zoneinfo-compile --input tzdata transitions Europe/Paris --from 2024
//! zoneinfo-compile --input tzdata list
//! ```

use std::{error::Error, fs, path::PathBuf, sync::Arc};

use clap::{Parser, Subcommand};
use temporal_format::{
    format::{DateTimeFormatter, FormatResources},
    offset::ZoneId,
    provider::CompiledZoneRulesProvider,
    temporal::{Instant, ZonedDateTime},
};
use zoneinfo_compiler::{ZoneInfoCompiler, ZoneInfoData};

#[derive(Parser)]
#[command(about = "Compiles zoneinfo files into zone rules")]
struct Cli {
    /// A zoneinfo file, or a tzdata directory with the usual file names.
    #[arg(short, long)]
    input: PathBuf,

    /// Also reads the zones of the "backzone" file.
    #[arg(long)]
    pack_rat: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Writes the rules of every zone as JSON.
    Compile {
        /// The tzdata version recorded in the output.
        #[arg(short, long, default_value = "unknown")]
        version: String,

        /// The output file, standard output if absent.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Prints the offset transitions of one zone.
    Transitions {
        zone: String,

        #[arg(long)]
        from: i32,

        /// The last year, the same as the first if absent.
        #[arg(long)]
        to: Option<i32>,

        /// The pattern transitions are printed with.
        #[arg(long, default_value = "yyyy-MM-dd'T'HH:mm:ssxxx'['VV']'")]
        pattern: String,
    },
    /// Lists the zone and link ids.
    List,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let data = if cli.input.is_dir() {
        ZoneInfoData::from_zoneinfo_directory(&cli.input)?
    } else {
        ZoneInfoData::from_filepath(&cli.input)?
    };
    let compiler = ZoneInfoCompiler::new(data).with_pack_rat(cli.pack_rat);

    match cli.command {
        Command::Compile { version, output } => {
            let collection = compiler.build(&version)?;
            let json = serde_json::to_string_pretty(&collection)?;
            match output {
                Some(path) => fs::write(path, json)?,
                None => println!("{json}"),
            }
        }
        Command::Transitions {
            zone,
            from,
            to,
            pattern,
        } => {
            let rules = compiler.build_zone(&zone)?;
            let provider = Arc::new(CompiledZoneRulesProvider::new(compiler.build("unknown")?));
            let resources = FormatResources::default().with_zones(provider.clone());
            let formatter = DateTimeFormatter::of_pattern(&pattern)?.with_resources(resources);
            let zone_id = ZoneId::of(&zone)?;

            for year in from..=to.unwrap_or(from) {
                for transition in rules.transitions_for_year(year) {
                    let instant = Instant::from_epoch_seconds(transition.epoch_seconds);
                    let zoned = ZonedDateTime::from_instant(instant, zone_id.clone(), provider.as_ref())?;
                    println!(
                        "{:<32} {:>6} -> {:>6}",
                        formatter.format(&zoned)?,
                        transition.offset_before,
                        transition.offset_after
                    );
                }
            }
        }
        Command::List => {
            let collection = compiler.build("unknown")?;
            for id in collection.provided_zone_ids() {
                println!("{id}");
            }
        }
    }
    Ok(())
}
