use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "leadboard", about = "Sales CRM dashboard statistics")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the dashboard stats endpoint over HTTP
    Serve {
        /// Listen address (overrides LEADBOARD_BIND)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Compute dashboard statistics directly from the database
    Stats {
        /// Display name of the requesting rep
        #[arg(long)]
        user: Option<String>,
        #[arg(long, default_value = "Setter")]
        role: String,
    },
    /// Dashboard statistics through the snapshot cache
    Dashboard {
        #[arg(long)]
        user: Option<String>,
        #[arg(long, default_value = "Setter")]
        role: String,
        /// Bypass a fresh cached snapshot
        #[arg(long)]
        refresh: bool,
        /// Print the cached snapshot right away and refresh it afterwards
        #[arg(long, conflicts_with = "refresh")]
        background: bool,
        /// Drop the cached snapshot and exit
        #[arg(long, conflicts_with_all = ["refresh", "background"])]
        invalidate: bool,
    },
    /// Add a sales rep
    UserAdd {
        /// JSON with name, email, roles (Setter, Closer, Admin)
        json: String,
    },
    /// List sales reps
    Users,
    /// Add a lead
    LeadAdd {
        /// JSON with name, email, phone, source
        json: String,
    },
    /// Record a contact attempt on a lead
    Contact {
        lead_id: String,
        /// Outcome label, e.g. "Beratungsgespräch"
        #[arg(long)]
        outcome: Option<String>,
        /// Contact date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// Assign a lead to a rep
    Assign { lead_id: String, user_id: String },
    /// Remove a lead assignment
    Unassign { lead_id: String, user_id: String },
    /// Add a deal to the pipeline
    DealAdd {
        /// JSON with title, setter_id, closer_id, consultation_at (RFC3339)
        json: String,
    },
    /// Mark a deal as won
    DealWin {
        id: String,
        /// Won-since date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// List deals
    Deals {
        #[arg(long, default_value = "50")]
        limit: usize,
    },
}
