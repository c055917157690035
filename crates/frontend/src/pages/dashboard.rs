//! Dashboard shell
//!
//! The content panels live behind this view; here it shows who is signed
//! in, how long the session has left, the analytics headline numbers and
//! the logout control.

use crate::auth::use_session;
use crate::hooks::use_session_guard;
use crate::services::AdminApi;
use gloo_timers::callback::Interval;
use serde::Deserialize;
use serde_json::Value;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

/// Analytics period requested when the dashboard opens
pub const DEFAULT_FILTER: &str = "7d";

const COUNTDOWN_TICK_MS: u32 = 1000;

/// Highlight the countdown once less than this is left
const WARN_BELOW_MS: i64 = 5 * 60 * 1000;

/// `/analytics/dashboard` with the period as a query parameter
fn analytics_endpoint(filter: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("filter", filter)
        .finish();
    format!("/analytics/dashboard?{query}")
}

/// Totals served by the analytics endpoint; missing counters read as zero
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct DashboardStats {
    total_views: u64,
    total_visitors: u64,
    total_video_plays: u64,
    top_videos: Vec<Value>,
}

impl DashboardStats {
    /// Read the stats out of a response, with or without the `data` envelope
    fn from_body(body: &Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(body.get("data").unwrap_or(body))
    }

    /// Pages per visitor, one decimal
    #[allow(clippy::cast_precision_loss)]
    fn engagement(&self) -> String {
        if self.total_visitors == 0 {
            return "0".to_string();
        }
        format!("{:.1}", self.total_views as f64 / self.total_visitors as f64)
    }

    /// Cards as (title, value, caption)
    fn cards(&self) -> Vec<(&'static str, String, String)> {
        vec![
            (
                "Total Page Views",
                self.total_views.to_string(),
                format!("{} unique visitors", self.total_visitors),
            ),
            (
                "Video Plays",
                self.total_video_plays.to_string(),
                format!("{} videos tracked", self.top_videos.len()),
            ),
            (
                "Avg Engagement",
                self.engagement(),
                "pages per visitor".to_string(),
            ),
        ]
    }
}

/// Time left in the session as shown in the nav bar
#[derive(Debug, Clone, PartialEq, Eq)]
struct Countdown {
    label: String,
    warn: bool,
}

impl Countdown {
    fn from_remaining(remaining_ms: i64) -> Self {
        if remaining_ms <= 0 {
            return Self {
                label: "Expired".to_string(),
                warn: true,
            };
        }
        let minutes = remaining_ms / 60_000;
        let seconds = (remaining_ms % 60_000) / 1000;
        Self {
            label: format!("{minutes}:{seconds:02}"),
            warn: remaining_ms < WARN_BELOW_MS,
        }
    }
}

#[function_component(DashboardPage)]
pub fn dashboard_page() -> Html {
    let session = use_session();
    let logout = use_session_guard();
    let stats = use_state(|| Option::<DashboardStats>::None);
    let stats_error = use_state(|| Option::<String>::None);
    let countdown = use_state(|| Option::<Countdown>::None);

    let identity = session
        .guard
        .sessions()
        .load()
        .and_then(|stored| stored.identity)
        .unwrap_or_default();

    {
        let session = session.clone();
        let stats = stats.clone();
        let stats_error = stats_error.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                let result = match AdminApi::from_session(&session) {
                    Ok(api) => api.get::<Value>(&analytics_endpoint(DEFAULT_FILTER)).await,
                    Err(e) => Err(e),
                };
                match result.map(|body| DashboardStats::from_body(&body)) {
                    Ok(Ok(loaded)) => stats.set(Some(loaded)),
                    Ok(Err(error)) => {
                        tracing::error!(%error, "Unexpected analytics response");
                        stats_error.set(Some("No analytics data available".to_string()));
                    }
                    Err(e) => stats_error.set(Some(e.user_message())),
                }
            });
        });
    }

    {
        let session = session.clone();
        let countdown = countdown.clone();
        use_effect_with((), move |_| {
            // Without a stored activity time the last value stays up
            let refresh = move || {
                if let Some(left) = session.guard.time_left() {
                    countdown.set(Some(Countdown::from_remaining(left)));
                }
            };
            refresh();
            let interval = Interval::new(COUNTDOWN_TICK_MS, refresh);

            move || drop(interval)
        });
    }

    let on_logout = logout.reform(|_: MouseEvent| ());

    let display_name = if identity.name.is_empty() {
        identity.email.clone()
    } else {
        identity.name.clone()
    };

    html! {
        <div class="min-h-screen bg-orange-50">
            <nav class="bg-white border-b border-orange-100">
                <div class="max-w-7xl mx-auto px-4 h-16 flex justify-between items-center">
                    <h1 class="text-2xl font-bold text-orange-700">{"ShlokSagar Admin"}</h1>
                    <div class="flex items-center gap-4">
                        if let Some(countdown) = &*countdown {
                            <div class="flex items-center gap-2 text-sm text-gray-600">
                                <span class="text-xs">{"Session:"}</span>
                                <span class={classes!("font-mono", "font-medium", countdown.warn.then_some("text-orange-600"))}>
                                    {countdown.label.clone()}
                                </span>
                            </div>
                        }
                        <span class="text-sm text-gray-600">{format!("Welcome, {display_name}")}</span>
                        <button
                            onclick={on_logout}
                            class="px-4 py-2 text-sm font-medium text-gray-700 bg-gray-100 hover:bg-gray-200 rounded-lg transition-colors"
                        >
                            {"Logout"}
                        </button>
                    </div>
                </div>
            </nav>
            <main class="max-w-7xl mx-auto px-4 py-8">
                if let Some(message) = &*stats_error {
                    <p class="text-sm text-red-700">{message}</p>
                } else if let Some(stats) = &*stats {
                    <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                        { for stats.cards().into_iter().map(|(title, value, caption)| html! {
                            <div class="bg-white rounded-lg shadow p-4">
                                <p class="text-sm font-medium text-gray-500">{title}</p>
                                <p class="text-2xl font-bold text-gray-800">{value}</p>
                                <p class="text-xs text-gray-500">{caption}</p>
                            </div>
                        }) }
                    </div>
                } else {
                    <p class="text-sm text-gray-500">{"Loading..."}</p>
                }
            </main>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_analytics_endpoint() {
        assert_eq!(
            analytics_endpoint(DEFAULT_FILTER),
            "/analytics/dashboard?filter=7d"
        );
        assert_eq!(
            analytics_endpoint("last month"),
            "/analytics/dashboard?filter=last+month"
        );
    }

    #[test]
    fn test_stats_from_envelope() {
        let body = json!({
            "success": true,
            "data": {
                "totalViews": 1250,
                "totalVisitors": 400,
                "totalVideoPlays": 87,
                "topVideos": [{"id": "a"}, {"id": "b"}],
                "dailyViews": []
            }
        });
        let stats = DashboardStats::from_body(&body).unwrap();
        assert_eq!(stats.total_views, 1250);
        assert_eq!(stats.total_video_plays, 87);

        let cards = stats.cards();
        assert_eq!(cards[0].1, "1250");
        assert_eq!(cards[0].2, "400 unique visitors");
        assert_eq!(cards[1].2, "2 videos tracked");
        assert_eq!(cards[2].1, "3.1");
    }

    #[test]
    fn test_stats_missing_counters_read_zero() {
        let stats = DashboardStats::from_body(&json!({"totalViews": 10})).unwrap();
        assert_eq!(stats.total_visitors, 0);
        assert_eq!(stats.engagement(), "0");
        assert!(DashboardStats::from_body(&json!({"totalViews": "many"})).is_err());
    }

    #[test]
    fn test_countdown_format() {
        assert_eq!(
            Countdown::from_remaining(1_800_000),
            Countdown {
                label: "30:00".to_string(),
                warn: false
            }
        );
        assert_eq!(Countdown::from_remaining(1_000).label, "0:01");
        assert_eq!(Countdown::from_remaining(65_999).label, "1:05");
        assert_eq!(Countdown::from_remaining(0).label, "Expired");
        assert_eq!(Countdown::from_remaining(-1_000).label, "Expired");
    }

    #[test]
    fn test_countdown_warns_in_last_five_minutes() {
        assert!(!Countdown::from_remaining(WARN_BELOW_MS).warn);
        assert!(Countdown::from_remaining(WARN_BELOW_MS - 1).warn);
        assert_eq!(Countdown::from_remaining(299_000).label, "4:59");
    }
}
