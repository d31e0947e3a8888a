use anyhow::{bail, Context, Result};
use folio_core::{AppError, Config};
use folio_proxy::WeatherProxy;
use folio_weather::{Coordinates, FixedLocator, Theme, Units};
use folio_widget::service::{locate, run_ticket, start};
use folio_widget::{
    JsonFileStore, ProxyClient, Status, StatusTone, Toast, WeatherCard, WeatherWidget,
    WidgetSettings, WidgetView,
};

const USAGE: &str = "\
Usage:
  folio [serve]                         Run the weather proxy
  folio weather [CITY] [--at LAT,LON] [--units metric|imperial]
                                        Fetch weather through the proxy";

#[derive(Debug, PartialEq)]
enum Command {
    Serve,
    Weather {
        city: Option<String>,
        at: Option<Coordinates>,
        units: Option<Units>,
    },
    Help,
}

fn parse_args<I>(args: I) -> Result<Command>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let command = match args.next().as_deref() {
        None | Some("serve") => Command::Serve,
        Some("help") | Some("-h") | Some("--help") => Command::Help,
        Some("weather") => {
            let mut words = Vec::new();
            let mut at = None;
            let mut units = None;
            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--at" => {
                        let value = args.next().context("--at needs LAT,LON")?;
                        at = Some(value.parse::<Coordinates>().map_err(anyhow::Error::msg)?);
                    }
                    "--units" => {
                        let value = args.next().context("--units needs a value")?;
                        units = Some(value.parse::<Units>().context("Invalid --units value")?);
                    }
                    _ => words.push(arg),
                }
            }
            let city = (!words.is_empty()).then(|| words.join(" "));
            Command::Weather { city, at, units }
        }
        Some(other) => bail!("Unknown command '{}'\n\n{}", other, USAGE),
    };
    Ok(command)
}

/// Prints what the widget shows to the terminal
#[derive(Debug, Default)]
struct TerminalView;

impl WidgetView for TerminalView {
    fn render_card(&mut self, card: &WeatherCard) {
        println!();
        println!("  {}", card.place);
        println!("  {}  {}", card.temperature, card.description);
        println!("  {}", card.feels_like);
        println!("  {}", card.humidity);
        println!("  {}", card.wind);
        println!("  {}", card.pressure);
        println!("  {}", card.icon_url);
        println!();
    }

    fn set_status(&mut self, status: &Status) {
        match status.tone {
            StatusTone::Muted => println!("{}", status.text),
            StatusTone::Error => eprintln!("{}", status.text),
        }
    }

    fn show_toast(&mut self, toast: &Toast) {
        tracing::debug!("Toast ({:?}): {}", toast.kind, toast.message);
    }

    fn render_recents(&mut self, cities: &[String]) {
        if !cities.is_empty() {
            println!("Recent: {}", cities.join(", "));
        }
    }

    fn set_theme(&mut self, theme: Theme) {
        tracing::debug!("Theme: {:?} ({})", theme, theme.toggle_glyph());
    }
}

async fn serve() -> Result<(), AppError> {
    let (config, _warnings) = Config::load_validated()?;

    let addr = config.proxy.socket_addr()?;
    let proxy = WeatherProxy::from_config(&config.proxy)?;
    folio_proxy::serve(proxy, addr).await?;
    Ok(())
}

async fn weather(
    city: Option<String>,
    at: Option<Coordinates>,
    units: Option<Units>,
) -> Result<(), AppError> {
    let config = Config::load()?;
    let source = ProxyClient::new(&config.widget.proxy_base_url)?;
    let store = JsonFileStore::new(&config.widget.preferences_file);
    tracing::debug!("Preferences at {}", store.path().display());
    let mut widget = WeatherWidget::new(
        store,
        TerminalView,
        WidgetSettings::from_config(&config.widget),
    );

    let unit_ticket = units.and_then(|u| widget.set_units(u));

    if let Some(position) = at {
        locate(&mut widget, &FixedLocator(position), &source).await;
    } else if let Some(city) = city {
        if let Some(ticket) = widget.submit(&city) {
            run_ticket(&mut widget, &source, ticket).await;
        }
    } else if let Some(ticket) = unit_ticket {
        run_ticket(&mut widget, &source, ticket).await;
    } else {
        start(&mut widget, &source).await;
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let command = parse_args(std::env::args().skip(1))?;
    if command == Command::Help {
        println!("{}", USAGE);
        return Ok(());
    }

    folio_core::init()?;

    let result = match command {
        Command::Serve => serve().await,
        Command::Weather { city, at, units } => weather(city, at, units).await,
        Command::Help => Ok(()),
    };

    if let Err(e) = &result {
        tracing::error!("Folio failed: {}", e);
        eprintln!("{}", e.user_message());
    }
    Ok(result?)
}
