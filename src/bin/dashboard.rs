//! An interactive terminal front-end for the dashboard
//!
//! Events are stored in the hosted table given by `DASHBOARD_STORE_URL` and `DASHBOARD_STORE_KEY`.
//! Without them, events are only kept in memory.

use std::io::{stdin, stdout, Write};
use std::sync::Arc;

use chrono::{Local, Utc};

use home_dashboard::client::Client;
use home_dashboard::config::{self, EVENTS_TABLE, SENSOR_DASHBOARD_URL};
use home_dashboard::memory::MemoryStore;
use home_dashboard::render;
use home_dashboard::shell::{Dashboard, Page, Tab};
use home_dashboard::traits::{EventStore, UserPrompt};
use home_dashboard::{DayCell, EventId};

const HELP: &str = "\
Commands:
  tab <sensors|calendar|meals>   switch tab
  p | n | t                      previous month, next month, today
  d <day>                        open the form for a day
  title <text> | type <event|activity|note> | time <HH:MM> | desc <text>
  save | cancel                  submit or close the form
  del <id>                       delete an event
  help | q";


/// Blocking dialogs, on the terminal
struct TerminalPrompt;

impl UserPrompt for TerminalPrompt {
    fn confirm(&mut self, message: &str) -> bool {
        print!("{} [y/N] ", message);
        let _ = stdout().flush();
        matches!(read_line().as_deref().map(str::trim), Some("y") | Some("Y") | Some("yes"))
    }

    fn alert(&mut self, message: &str) {
        println!("!! {}", message);
    }
}

fn read_line() -> Option<String> {
    let mut line = String::new();
    match stdin().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line),
    }
}


#[tokio::main]
async fn main() {
    env_logger::init();

    if let Ok(table) = std::env::var("DASHBOARD_EVENTS_TABLE") {
        config::set(&EVENTS_TABLE, &table);
    }
    if let Ok(url) = std::env::var("DASHBOARD_SENSORS_URL") {
        config::set(&SENSOR_DASHBOARD_URL, &url);
    }

    match (std::env::var("DASHBOARD_STORE_URL"), std::env::var("DASHBOARD_STORE_KEY")) {
        (Ok(url), Ok(key)) => match Client::new(&url, key) {
            Ok(client) => {
                log::info!("Using the events of {}", client.table_url().map(|u| u.to_string()).unwrap_or(url));
                run(Arc::new(client)).await
            },
            Err(err) => log::error!("Invalid store URL: {}", err),
        },
        _ => {
            log::warn!("DASHBOARD_STORE_URL or DASHBOARD_STORE_KEY is not set, events will only be kept in memory");
            run(Arc::new(MemoryStore::new())).await
        },
    }
}

async fn run<S: EventStore>(store: Arc<S>) {
    let mut dashboard = Dashboard::new(store).await;
    let mut prompt = TerminalPrompt;
    println!("{}", HELP);

    loop {
        show(&dashboard);
        print!("> ");
        let _ = stdout().flush();
        let line = match read_line() {
            None => break,
            Some(line) => line,
        };
        let (command, argument) = match line.trim().split_once(' ') {
            Some((command, argument)) => (command.to_string(), argument.trim().to_string()),
            None => (line.trim().to_string(), String::new()),
        };

        match command.as_str() {
            "" => continue,
            "q" | "quit" => break,
            "help" => println!("{}", HELP),
            "tab" => match argument.parse::<Tab>() {
                Ok(tab) => dashboard.select(tab).await,
                Err(err) => println!("{}", err),
            },
            _ => match dashboard.calendar_mut() {
                None => println!("Unknown command {:?} (calendar commands need the calendar tab)", command),
                Some(calendar) => {
                    // Failures are logged by the calendar itself
                    let _ = match command.as_str() {
                        "p" => calendar.previous_month().await,
                        "n" => calendar.next_month().await,
                        "t" => calendar.today().await,
                        "d" => {
                            match argument.parse::<u32>() {
                                Ok(day) if calendar.click_day(DayCell::Day(day)) => {},
                                _ => println!("No such day: {:?}", argument),
                            }
                            Ok(())
                        },
                        "title" => { calendar.form_mut().title = argument; Ok(()) },
                        "desc" => { calendar.form_mut().description = argument; Ok(()) },
                        "time" => { calendar.form_mut().time = argument; Ok(()) },
                        "type" => {
                            match argument.parse() {
                                Ok(event_type) => calendar.form_mut().event_type = event_type,
                                Err(err) => println!("{}", err),
                            }
                            Ok(())
                        },
                        "save" => calendar.submit(&mut prompt).await.map(|_| ()),
                        "cancel" => { calendar.cancel(); Ok(()) },
                        "del" => calendar.delete(&EventId::from(argument), &mut prompt).await.map(|_| ()),
                        _ => { println!("Unknown command {:?}", command); Ok(()) },
                    };
                },
            },
        }
    }
}

fn show<S: EventStore>(dashboard: &Dashboard<S, Local>) {
    println!();
    print!("{}", render::render_nav(dashboard.active()));
    println!();
    match dashboard.page() {
        Page::Sensors(page) => println!("{}: {}", page.url(), home_dashboard::shell::SensorsPage::TITLE),
        Page::MealMenu(_) => println!("{}", home_dashboard::shell::MealMenuPage::TITLE),
        Page::Calendar(calendar) => {
            let today = Utc::now().with_timezone(&Local).date_naive();
            print!("{}", render::render_month(calendar, Some(today)));
            print!("{}", render::render_modal(calendar));
            if calendar.is_composing() {
                let form = calendar.form();
                println!("Form: title={:?} type={} time={:?} description={:?}", form.title, form.event_type, form.time, form.description);
            }
        },
    }
}
