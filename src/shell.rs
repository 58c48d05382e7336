//! The top-level tab navigation
//!
//! Exactly one page is mounted at a time. Switching tabs drops the previous page and mounts a fresh
//! one, so that pages never share any state (e.g. the calendar goes back to the current month).

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

use chrono::{Local, TimeZone};

use crate::config::{self, SENSOR_DASHBOARD_URL};
use crate::traits::EventStore;
use crate::view::CalendarView;


#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tab {
    Sensors,
    Calendar,
    MealMenu,
}

impl Tab {
    /// Tabs, in the order of the navigation bar
    pub const ALL: [Tab; 3] = [Tab::Sensors, Tab::Calendar, Tab::MealMenu];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Sensors => "Sensors",
            Tab::Calendar => "Calendar",
            Tab::MealMenu => "Meal Menu",
        }
    }
}

impl Default for Tab {
    fn default() -> Self {
        Tab::Sensors
    }
}

impl Display for Tab {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s.chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "sensors" => Ok(Tab::Sensors),
            "calendar" => Ok(Tab::Calendar),
            "mealmenu" | "meals" | "menu" => Ok(Tab::MealMenu),
            _ => Err(format!("Unknown tab {:?}", s)),
        }
    }
}


/// The Sensors page: a third-party dashboard, embedded by URL
#[derive(Clone, Debug, PartialEq)]
pub struct SensorsPage {
    url: String,
}

impl SensorsPage {
    pub const TITLE: &'static str = "Sensor Dashboard";

    /// The page for the dashboard set in [`config::SENSOR_DASHBOARD_URL`]
    pub fn from_config() -> Self {
        Self::with_url(config::current(&SENSOR_DASHBOARD_URL))
    }

    pub fn with_url<T: ToString>(url: T) -> Self {
        Self { url: url.to_string() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// A borderless iframe that fills its container
    pub fn iframe_html(&self) -> String {
        let src = self.url
            .replace('&', "&amp;")
            .replace('"', "&quot;")
            .replace('<', "&lt;")
            .replace('>', "&gt;");
        format!(
            r#"<iframe src="{}" style="width: 100%; height: 100%; border: none" title="{}"></iframe>"#,
            src, Self::TITLE
        )
    }
}


/// The Meal Menu page. It has no content yet
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MealMenuPage;

impl MealMenuPage {
    pub const TITLE: &'static str = "Meal Menu";
}


/// The page that is currently mounted
pub enum Page<S, Tz = Local>
where
    S: EventStore,
    Tz: TimeZone,
{
    Sensors(SensorsPage),
    Calendar(CalendarView<S, Tz>),
    MealMenu(MealMenuPage),
}

impl<S: EventStore, Tz: TimeZone> Page<S, Tz> {
    pub fn tab(&self) -> Tab {
        match self {
            Page::Sensors(_) => Tab::Sensors,
            Page::Calendar(_) => Tab::Calendar,
            Page::MealMenu(_) => Tab::MealMenu,
        }
    }
}


/// The whole dashboard: a navigation bar and the page of the active tab
pub struct Dashboard<S, Tz = Local>
where
    S: EventStore,
    Tz: TimeZone,
{
    store: Arc<S>,
    tz: Tz,

    page: Page<S, Tz>,
}

impl<S: EventStore> Dashboard<S, Local> {
    /// Create a dashboard showing the default tab, with a calendar in the local timezone
    pub async fn new(store: Arc<S>) -> Self {
        Self::with_timezone(store, Local).await
    }
}

impl<S, Tz> Dashboard<S, Tz>
where
    S: EventStore,
    Tz: TimeZone,
{
    pub async fn with_timezone(store: Arc<S>, tz: Tz) -> Self {
        let page = mount(Tab::default(), &store, &tz).await;
        Self { store, tz, page }
    }

    /// The tab that is currently shown
    pub fn active(&self) -> Tab {
        self.page.tab()
    }

    /// Shows another tab. Selecting the active tab again does nothing
    pub async fn select(&mut self, tab: Tab) {
        if tab == self.active() {
            return;
        }
        log::debug!("Switching from {} to {}", self.active(), tab);
        self.page = mount(tab, &self.store, &self.tz).await;
    }

    pub fn page(&self) -> &Page<S, Tz> {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut Page<S, Tz> {
        &mut self.page
    }

    /// The calendar, if it is the active tab
    pub fn calendar(&self) -> Option<&CalendarView<S, Tz>> {
        match &self.page {
            Page::Calendar(view) => Some(view),
            _ => None,
        }
    }

    /// The calendar, if it is the active tab
    pub fn calendar_mut(&mut self) -> Option<&mut CalendarView<S, Tz>> {
        match &mut self.page {
            Page::Calendar(view) => Some(view),
            _ => None,
        }
    }
}

async fn mount<S, Tz>(tab: Tab, store: &Arc<S>, tz: &Tz) -> Page<S, Tz>
where
    S: EventStore,
    Tz: TimeZone,
{
    match tab {
        Tab::Sensors => Page::Sensors(SensorsPage::from_config()),
        Tab::MealMenu => Page::MealMenu(MealMenuPage),
        Tab::Calendar => {
            let mut view = CalendarView::with_timezone(Arc::clone(store), tz.clone());
            // A failed first load is logged, and simply shows an empty month
            let _ = view.mount().await;
            Page::Calendar(view)
        },
    }
}
