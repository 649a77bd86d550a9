//! Serves a config struct on the session bus and re-renders a template
//! whenever a property changes.
//!
//! Watch the output move from another terminal:
//!
//! ```sh
//! busctl --user set-property org.confbus /config org.confbus.Config SomeInt i 7
//! busctl --user introspect org.confbus /config
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use confbus::{Change, Record, Updatable, UpdateError, record_fields};
use dbus::arg::RefArg;
use dbus::blocking::Connection;
use dbus::blocking::stdintf::org_freedesktop_dbus::RequestNameReply;
use dbus_crossroads::Crossroads;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Bus error name reported when rendering fails.
const RENDER_ERROR: &str = "org.confbus.Error.Rendering";

#[derive(Parser)]
#[command(
    name = "template_demo",
    about = "Expose a config struct that re-renders a template on update"
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

    /// Template with `{{SomeInt}}`-style placeholders.
    #[arg(long, default_value = "demos/template/config.tpl")]
    template: PathBuf,

    /// Write rendered output here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

struct Config {
    some_int: i32,
    some_string: String,
    renderer: Renderer,
}

record_fields!(Config { some_int: i32, some_string: String });

impl Updatable for Config {
    fn update(&mut self, change: &Change) -> Result<(), UpdateError> {
        self.apply(change)?;
        info!(property = %change.name, "config changed, rendering");
        self.render()
    }
}

impl Config {
    fn render(&self) -> Result<(), UpdateError> {
        self.renderer
            .render(self)
            .map_err(|e| UpdateError::new(RENDER_ERROR, e.to_string()))
    }
}

/// Fills template placeholders from the record's property map.
struct Renderer {
    template: String,
    out: Option<PathBuf>,
}

impl Renderer {
    fn load(template: &Path, out: Option<PathBuf>) -> anyhow::Result<Self> {
        let template = fs::read_to_string(template)
            .with_context(|| format!("reading template {}", template.display()))?;
        Ok(Self { template, out })
    }

    fn render(&self, config: &Config) -> io::Result<()> {
        let mut text = self.template.clone();
        for (name, value) in config.project() {
            let placeholder = ["{{", &name, "}}"].concat();
            text = text.replace(&placeholder, &display(&*value.0));
        }
        match &self.out {
            Some(path) => fs::write(path, text),
            None => {
                let mut stdout = io::stdout();
                stdout.write_all(text.as_bytes())?;
                stdout.flush()
            }
        }
    }
}

/// Renders a property value for substitution into the template.
fn display(value: &dyn RefArg) -> String {
    if let Some(s) = value.as_str() {
        s.to_string()
    } else if let Some(i) = value.as_i64() {
        i.to_string()
    } else if let Some(u) = value.as_u64() {
        u.to_string()
    } else if let Some(f) = value.as_f64() {
        f.to_string()
    } else {
        format!("{value:?}")
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
        renderer: Renderer::load(&args.template, args.out.clone())?,
    };
    // render once at startup
    config.render()?;

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
