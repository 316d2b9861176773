use clap::Subcommand;

use carrinhos::model::Unit;

use crate::cli_commands::parse_unit;

#[derive(Subcommand)]
pub(crate) enum RemoteCommands {
    /// Show the configured remote
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Set the configured remote
    Set {
        #[arg(long)]
        url: String,
        #[arg(long)]
        api_key: String,
    },
}

#[derive(Subcommand)]
pub(crate) enum ItemCommands {
    /// Create a catalog item
    Add {
        name: String,
        /// Category (defaults to "Geral")
        #[arg(long, default_value = "")]
        category: String,
        /// Unit: unidade|kg|litro
        #[arg(long, default_value = "unidade", value_parser = parse_unit)]
        unit: Unit,
    },
    /// Rename or recategorize a catalog item
    Edit {
        /// Current item name
        item: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, value_parser = parse_unit)]
        unit: Option<Unit>,
    },
    /// Delete a catalog item and remove it from every list
    Rm { item: String },
}

#[derive(Subcommand)]
pub(crate) enum ListCommands {
    /// Create a shopping list
    Add {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Rename a list or change its description
    Edit {
        /// Current list name
        list: String,
        #[arg(long)]
        name: Option<String>,
        /// Empty string clears the description
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a list (catalog items are kept)
    Rm { list: String },
}

#[derive(Subcommand)]
pub(crate) enum EntryCommands {
    /// Put an item on a list (adds to the quantity if already there)
    Add {
        list: String,
        item: String,
        #[arg(long, default_value_t = 1.0)]
        quantity: f64,
        #[arg(long, default_value_t = 0.0)]
        price: f64,
    },
    /// Change quantity or price of an entry
    Set {
        list: String,
        item: String,
        #[arg(long)]
        quantity: Option<f64>,
        #[arg(long)]
        price: Option<f64>,
    },
    /// Toggle the completed mark of an entry
    Toggle { list: String, item: String },
    /// Remove an item from a list
    Rm { list: String, item: String },
}
