use clap::{Args, Parser, Subcommand, ValueEnum};
use defectdesk::model::PhotoRole;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "defectdesk", bin_name = "defectdesk", version)]
#[command(about = "Warehouse defect evidence recorder", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output (debug logs on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List receptions (reconciles the catalog with disk)
    #[command(alias = "ls")]
    List,

    /// Register a reception and create its directory
    Add {
        /// Manufacturer code
        manufacturer: String,
        /// Reception date, DD-MM-YYYY
        date: String,
    },

    /// Create item directories for a scanned article
    Prepare {
        manufacturer: String,
        date: String,
        article: String,

        /// Defect category: 1 minor, 2 wear, 3 rejected
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=3))]
        category: u8,

        /// Number of defective units (1-10)
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },

    /// Store a box or product photo for one item
    Photo {
        #[command(flatten)]
        item: ItemArgs,

        /// Which photo this is
        #[arg(short, long, value_enum)]
        role: RoleArg,

        /// Captured image file
        file: PathBuf,

        /// Move the file instead of copying it
        #[arg(long = "move")]
        move_source: bool,
    },

    /// Write the trilingual evidence text for one item
    Note {
        #[command(flatten)]
        item: ItemArgs,

        #[arg(long)]
        reason: String,

        #[arg(long, default_value = "")]
        template: String,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// Print the evidence text of one item
    Show {
        #[command(flatten)]
        item: ItemArgs,
    },

    /// Reconcile catalog and disk and report what was fixed
    Doctor,

    /// Check which storage roots are writable
    Probe,

    /// Get or set configuration
    Config {
        /// Configuration key (base-dir-name, scoped-storage)
        key: Option<String>,
        /// Value to set
        value: Option<String>,
    },
}

/// Addresses one item directory.
#[derive(Args, Debug)]
pub struct ItemArgs {
    pub manufacturer: String,
    pub date: String,
    pub article: String,

    /// Unit number within the article (1-10)
    pub index: u32,

    /// Defect category: 1 minor, 2 wear, 3 rejected
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=3))]
    pub category: u8,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum RoleArg {
    Box,
    Product,
}

impl From<RoleArg> for PhotoRole {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Box => PhotoRole::Box,
            RoleArg::Product => PhotoRole::Product,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_photo_command() {
        let cli = Cli::try_parse_from([
            "defectdesk",
            "photo",
            "1234",
            "05-03-2024",
            "AA100",
            "2",
            "--role",
            "product",
            "-c",
            "3",
            "shot.jpg",
            "--move",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Photo {
                item,
                role,
                file,
                move_source,
            }) => {
                assert_eq!(item.index, 2);
                assert_eq!(item.category, 3);
                assert!(matches!(role, RoleArg::Product));
                assert_eq!(file, PathBuf::from("shot.jpg"));
                assert!(move_source);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn rejects_unknown_category() {
        assert!(Cli::try_parse_from([
            "defectdesk",
            "prepare",
            "1234",
            "05-03-2024",
            "AA100",
            "-c",
            "4"
        ])
        .is_err());
    }

    #[test]
    fn no_subcommand_means_list() {
        let cli = Cli::try_parse_from(["defectdesk", "-v"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.verbose);
    }
}
