//! Serves a config struct whose updates must pass per-instance limits
//! before they count as accepted.
//!
//! ```sh
//! busctl --user set-property org.confbus /config org.confbus.Config SomeString s abcd
//! ```
//!
//! The set above is rejected with
//! `org.confbus.Error.Validation: SomeString[len=3] <> abcd`
//! and the remote caller sees that error name and message.

use clap::Parser;
use confbus::{Change, Record, Updatable, UpdateError, record_fields};
use dbus::blocking::Connection;
use dbus::blocking::stdintf::org_freedesktop_dbus::RequestNameReply;
use dbus_crossroads::Crossroads;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Bus error name reported when a change violates the limits.
const VALIDATION_ERROR: &str = "org.confbus.Error.Validation";

#[derive(Parser)]
#[command(
    name = "validate_demo",
    about = "Expose a config struct whose updates are validated"
)]
struct Args {
    /// Bus name to claim on the session bus.
    #[arg(long, default_value = "org.confbus")]
    bus_name: String,

    /// Object path the config is exported at.
    #[arg(long, default_value = "/config")]
    path: String,

    /// Interface the properties live on.
    #[arg(long, default_value = "org.confbus.Config")]
    interface: String,

    /// Highest accepted SomeInt value.
    #[arg(long, default_value_t = 50)]
    max_int: i32,

    /// Exact SomeString length required.
    #[arg(long, default_value_t = 3)]
    string_len: usize,
}

struct Config {
    some_int: i32,
    some_string: String,
    limits: Limits,
}

record_fields!(Config { some_int: i32, some_string: String });

impl Updatable for Config {
    fn update(&mut self, change: &Change) -> Result<(), UpdateError> {
        self.apply(change)?;
        let violations = self.limits.check(self);
        if !violations.is_empty() {
            return Err(UpdateError::new(VALIDATION_ERROR, violations.join("; ")));
        }
        info!(property = %change.name, "accepted update");
        Ok(())
    }
}

/// Bounds every accepted record state must satisfy.
struct Limits {
    max_int: i32,
    string_len: usize,
}

impl Limits {
    /// Returns one `Field[tag=param] <> value` line per violated bound.
    fn check(&self, config: &Config) -> Vec<String> {
        let mut violations = Vec::new();
        if config.some_int > self.max_int {
            violations.push(format!(
                "SomeInt[max={}] <> {}",
                self.max_int, config.some_int
            ));
        }
        if config.some_string.chars().count() != self.string_len {
            violations.push(format!(
                "SomeString[len={}] <> {}",
                self.string_len, config.some_string
            ));
        }
        violations
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let config = Config {
        some_int: 42,
        some_string: "egg".to_string(),
        limits: Limits {
            max_int: args.max_int,
            string_len: args.string_len,
        },
    };

    let conn = Connection::new_session()?;
    let reply = conn.request_name(args.bus_name.as_str(), false, true, true)?;
    if !matches!(reply, RequestNameReply::PrimaryOwner) {
        anyhow::bail!("bus name {} is already taken", args.bus_name);
    }

    let mut cr = Crossroads::new();
    confbus::export(&mut cr, &args.path, &args.interface, config)?;
    info!(bus_name = %args.bus_name, path = %args.path, "serving config");

    cr.serve(&conn)?;
    unreachable!()
}
