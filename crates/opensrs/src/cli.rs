//! Clap derive structures for the `opensrs` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Only depends on clap so `build.rs` can include it for man pages.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// opensrs -- domain reseller operations from the command line
#[derive(Debug, Parser)]
#[command(
    name = "opensrs",
    version,
    about = "Manage OpenSRS domains, DNS zones and nameservers from the command line",
    long_about = "A CLI for the OpenSRS reseller XML API.\n\n\
        Looks up, prices and registers domains, edits DNS zones without\n\
        clobbering existing records, and manages nameservers and transfers.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Reseller profile to use
    #[arg(long, short = 'p', env = "OPENSRS_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Reseller username (overrides profile)
    #[arg(long, short = 'u', env = "OPENSRS_USERNAME", global = true)]
    pub username: Option<String>,

    /// Reseller API key
    #[arg(long, env = "OPENSRS_API_KEY", global = true, hide_env = true)]
    pub api_key: Option<String>,

    /// Registrar environment (overrides profile)
    #[arg(long, short = 'e', env = "OPENSRS_ENVIRONMENT", global = true)]
    pub environment: Option<EnvironmentArg>,

    /// Endpoint URL override (proxies, local testing)
    #[arg(long, env = "OPENSRS_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "OPENSRS_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "OPENSRS_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON envelope
    Json,
    /// Compact single-line JSON envelope
    JsonCompact,
    /// YAML envelope
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

impl OutputFormat {
    /// Structured formats carry the full envelope, errors included.
    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Json | Self::JsonCompact | Self::Yaml)
    }
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum EnvironmentArg {
    /// horizon sandbox, nothing is charged
    Test,
    /// Production
    Live,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Look up, price, register and maintain domains
    #[command(alias = "domain", alias = "d")]
    Domains(DomainsArgs),

    /// Read and edit DNS zones
    Dns(DnsArgs),

    /// Manage registry nameserver hosts and delegation
    #[command(alias = "ns")]
    Nameservers(NameserversArgs),

    /// Check and start inbound transfers
    Transfer(TransferArgs),

    /// Reseller account information
    Account(AccountArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DOMAINS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DomainsArgs {
    #[command(subcommand)]
    pub command: DomainsCommand,
}

/// Domains given inline or read from a file (one per line).
#[derive(Debug, Args)]
pub struct DomainListArgs {
    /// Domain names
    #[arg(required_unless_present = "from_file")]
    pub domains: Vec<String>,

    /// Read domains from a file, one per line (`#` starts a comment)
    #[arg(long, short = 'F')]
    pub from_file: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum DomainsCommand {
    /// Check whether a domain is available
    Lookup {
        domain: String,

        /// Bypass the response cache
        #[arg(long)]
        fresh: bool,
    },

    /// Check availability of several domains (max 100)
    BulkLookup(DomainListArgs),

    /// Registration price for a domain
    Price {
        domain: String,

        /// Registration period in years (1-10)
        #[arg(long, default_value = "1")]
        period: u32,
    },

    /// Prices for several domains (max 100)
    BulkPrice {
        #[command(flatten)]
        list: DomainListArgs,

        /// Registration period in years (1-10)
        #[arg(long, default_value = "1")]
        period: u32,
    },

    /// Suggest alternative names
    Suggest {
        /// Search string (a name or keywords)
        searchstring: String,

        /// TLDs to search (comma-separated, e.g. ".com,.net")
        #[arg(long, short = 't', value_delimiter = ',')]
        tld: Vec<String>,

        /// Services to query (default: all)
        #[arg(long, short = 's', value_delimiter = ',', value_enum)]
        service: Vec<SuggestServiceArg>,

        /// Maximum results per service
        #[arg(long)]
        max: Option<u32>,
    },

    /// Register a domain from a JSON request file
    Register {
        /// JSON file with domain, period, contacts, nameservers, reg_username, reg_password
        #[arg(long, short = 'F')]
        from_file: PathBuf,
    },

    /// Renew a domain
    Renew {
        domain: String,

        /// Years to add (1-10)
        #[arg(long, default_value = "1")]
        period: u32,

        /// Current expiration year (the registrar checks it)
        #[arg(long)]
        expiration_year: u32,

        /// Also turn on auto-renew
        #[arg(long)]
        auto_renew: bool,
    },

    /// Show registration details
    Info { domain: String },

    /// Replace the domain's contacts from a JSON file
    UpdateContacts {
        domain: String,

        /// JSON file holding either a full contact set (owner/admin/tech/billing)
        /// or one contact used for every role
        #[arg(long, short = 'F')]
        from_file: PathBuf,
    },

    /// Turn on the registrar transfer lock
    Lock { domain: String },

    /// Turn off the registrar transfer lock
    Unlock { domain: String },

    /// Turn auto-renew on or off
    AutoRenew {
        domain: String,

        #[arg(value_enum)]
        state: Toggle,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SuggestServiceArg {
    Lookup,
    Suggestion,
    Premium,
    PersonalNames,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DNS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DnsArgs {
    #[command(subcommand)]
    pub command: DnsCommand,
}

/// Fields of one record.
#[derive(Debug, Args)]
pub struct RecordArgs {
    /// Record type
    #[arg(long = "type", short = 't', value_enum)]
    pub record_type: DnsRecordType,

    /// Host label relative to the zone ("@" for the apex)
    #[arg(long, short = 's', default_value = "@")]
    pub subdomain: String,

    /// IP address, hostname or TXT content
    #[arg(long, short = 'a')]
    pub address: String,

    /// Priority (MX and SRV)
    #[arg(long)]
    pub priority: Option<u16>,

    /// Weight (SRV)
    #[arg(long)]
    pub weight: Option<u16>,

    /// Port (SRV)
    #[arg(long)]
    pub port: Option<u16>,

    /// TTL in seconds
    #[arg(long)]
    pub ttl: Option<u32>,
}

#[derive(Debug, Subcommand)]
pub enum DnsCommand {
    /// Show a domain's zone
    Get { domain: String },

    /// Create a zone, optionally from a DNS template
    Create {
        domain: String,

        /// Reseller DNS template name
        #[arg(long)]
        template: Option<String>,
    },

    /// Delete a domain's zone
    Delete { domain: String },

    /// Replace the whole zone from a JSON file of records
    Set {
        domain: String,

        /// JSON array of records ({"type","subdomain","address",...})
        #[arg(long, short = 'F')]
        from_file: PathBuf,
    },

    /// Add one record, keeping every existing record
    Add {
        domain: String,

        #[command(flatten)]
        record: RecordArgs,

        /// Re-read the zone afterwards and report whether it took effect
        #[arg(long)]
        verify: bool,
    },

    /// Replace one record
    Update {
        domain: String,

        /// Current subdomain of the record to replace
        #[arg(long, default_value = "@")]
        match_subdomain: String,

        /// Current address, required when several records share type and subdomain
        #[arg(long)]
        match_address: Option<String>,

        #[command(flatten)]
        record: RecordArgs,

        /// Re-read the zone afterwards and report whether it took effect
        #[arg(long)]
        verify: bool,
    },

    /// Remove one record
    Remove {
        domain: String,

        /// Record type
        #[arg(long = "type", short = 't', value_enum)]
        record_type: DnsRecordType,

        /// Host label ("@" for the apex)
        #[arg(long, short = 's', default_value = "@")]
        subdomain: String,

        /// Address, required when several records share type and subdomain
        #[arg(long, short = 'a')]
        address: Option<String>,

        /// Re-read the zone afterwards and report whether it took effect
        #[arg(long)]
        verify: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DnsRecordType {
    A,
    Aaaa,
    Cname,
    Mx,
    Txt,
    Srv,
    Ns,
    Ptr,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  NAMESERVERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct NameserversArgs {
    #[command(subcommand)]
    pub command: NameserversCommand,
}

#[derive(Debug, Subcommand)]
pub enum NameserversCommand {
    /// List nameserver hosts registered under a domain
    #[command(alias = "ls")]
    List { domain: String },

    /// Register a nameserver host (glue record)
    Create {
        domain: String,
        /// Host name, e.g. ns1.example.com
        name: String,
        /// IPv4 address
        ip: String,
    },

    /// Delete a nameserver host
    Delete {
        domain: String,
        name: String,
        /// IPv4 address, when the registry requires it
        #[arg(long)]
        ip: Option<String>,
    },

    /// Change a nameserver host's address or name
    Modify {
        domain: String,
        name: String,
        /// New IPv4 address
        #[arg(long)]
        ip: String,
        /// Rename the host
        #[arg(long)]
        new_name: Option<String>,
    },

    /// Delegate the domain to these nameservers (at least two)
    Assign {
        domain: String,
        #[arg(required = true, num_args = 2..)]
        nameservers: Vec<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TRANSFER / ACCOUNT
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct TransferArgs {
    #[command(subcommand)]
    pub command: TransferCommand,
}

#[derive(Debug, Subcommand)]
pub enum TransferCommand {
    /// Check whether a domain can be transferred in
    Check { domain: String },

    /// Start an inbound transfer from a JSON request file
    Start {
        /// JSON file with domain, auth_info, contacts, reg_username, reg_password
        #[arg(long, short = 'F')]
        from_file: PathBuf,
    },
}

#[derive(Debug, Args)]
pub struct AccountArgs {
    #[command(subcommand)]
    pub command: AccountCommand,
}

#[derive(Debug, Subcommand)]
pub enum AccountCommand {
    /// Reseller account balance
    Balance,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display the configuration (API keys redacted)
    Show,

    /// Set a value on the active profile
    Set {
        /// Profile key (username, environment, endpoint, timeout, ...)
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store an API key in the system keyring
    SetKey {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
