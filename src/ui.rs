//! Terminal rendering with `ratatui`.
//!
//! `draw` is a pure function of the app model, the coordinator's observable
//! state and a `Theme`; it never mutates anything.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::time::{Duration, Instant};

use crate::app::App;
use crate::config::{ControlsSettings, TimeField, TrackDisplayField, UiSettings};
use crate::library::Track;
use crate::player::Coordinator;

mod theme;

pub use theme::Theme;

const LEFT_PAD: Padding = Padding {
    left: 1,
    right: 0,
    top: 0,
    bottom: 0,
};

/// Key help, in display order. Entries with `None` are filled from settings.
const CONTROLS: &[(&str, Option<&str>)] = &[
    ("j/k", Some("up/down")),
    ("h/l", Some("prev/next")),
    ("H/L", None),
    ("enter", Some("play selected")),
    ("space/p", Some("play/pause")),
    ("x", Some("stop")),
    ("0-9", Some("seek to 0-90%")),
    ("+/-", None),
    ("a", Some("enqueue")),
    ("c", Some("clear queue")),
    ("t/T", None),
    ("s", Some("shuffle")),
    ("r", Some("repeat")),
    ("gg/G", Some("top/bottom")),
    ("K", Some("metadata")),
    ("m", Some("theme")),
    ("q", Some("quit")),
];

fn controls_text(controls: &ControlsSettings) -> String {
    CONTROLS
        .iter()
        .map(|(key, label)| {
            let label = match (*key, label) {
                (_, Some(label)) => label.to_string(),
                ("H/L", None) => format!("scrub -/+{}s", controls.scrub_seconds),
                ("+/-", None) => format!("volume +/-{}%", controls.volume_step),
                _ => format!("sleep {} min/cancel", controls.sleep_minutes),
            };
            format!("[{key}] {label}")
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Format an optional duration, rounding up partial seconds, showing total seconds.
fn format_duration_mmss_ceil(d: Option<Duration>) -> String {
    let Some(d) = d else {
        return "-".to_string();
    };
    let mut total_secs = d.as_secs();
    if d.subsec_nanos() > 0 {
        total_secs = total_secs.saturating_add(1);
    }
    format!("{}:{:02} ({}s)", total_secs / 60, total_secs % 60, total_secs)
}

/// The "now playing" track text according to `ui` settings.
fn now_playing_track_text(track: &Track, ui: &UiSettings) -> String {
    let non_blank = |s: Option<&str>| s.map(str::trim).filter(|s| !s.is_empty()).map(String::from);
    let parts: Vec<String> = ui
        .now_playing_track_fields
        .iter()
        .filter_map(|field| match field {
            TrackDisplayField::Display => non_blank(Some(track.display.as_str())),
            TrackDisplayField::Title => non_blank(Some(track.title.as_str())),
            TrackDisplayField::Artist => non_blank(track.artist.as_deref()),
            TrackDisplayField::Album => non_blank(track.album.as_deref()),
            TrackDisplayField::Filename => non_blank(track.path.file_stem().and_then(|s| s.to_str())),
            TrackDisplayField::Path => Some(track.path.display().to_string()),
        })
        .collect();

    if parts.is_empty() {
        track.display.clone()
    } else {
        parts.join(&ui.now_playing_track_separator)
    }
}

/// Elapsed/total/remaining text per `UiSettings`, or `None` if nothing is configured.
fn now_playing_time_text(elapsed: Duration, total: Option<Duration>, ui: &UiSettings) -> Option<String> {
    let parts: Vec<String> = ui
        .now_playing_time_fields
        .iter()
        .filter_map(|field| match field {
            TimeField::Elapsed => Some(format_mmss(elapsed)),
            TimeField::Total => total.map(format_mmss),
            TimeField::Remaining => total.map(|t| format!("-{}", format_mmss(t.saturating_sub(elapsed)))),
        })
        .collect();

    (!parts.is_empty()).then(|| parts.join(&ui.now_playing_time_separator))
}

fn queue_text(player: &Coordinator) -> String {
    let names: Vec<&str> = player.queue().map(|t| t.display.as_str()).collect();
    if names.is_empty() {
        "Queue: Empty".to_string()
    } else {
        format!("Queue: {}", names.join(" → "))
    }
}

fn status_text(player: &Coordinator, app: &App, now: Instant) -> String {
    let on_off = |flag: bool| if flag { "On" } else { "Off" };
    let mut parts = vec![
        player.status().to_string(),
        format!("Shuffle: {}", on_off(player.shuffle())),
        format!("Repeat: {}", on_off(player.repeat())),
        format!("Vol: {}%", player.volume_percent()),
    ];
    if let Some(left) = player.sleep_remaining(now) {
        parts.push(format!("Sleep: {}", format_mmss(left)));
    }
    if let Some(dir) = &app.current_dir {
        parts.push(format!("Dir: {dir}"));
    }
    parts.join(" • ")
}

/// Fraction of the track played, in `[0, 1]`.
fn progress_ratio(elapsed: Duration, total: Option<Duration>) -> f64 {
    match total {
        Some(t) if !t.is_zero() => (elapsed.as_secs_f64() / t.as_secs_f64()).clamp(0.0, 1.0),
        _ => 0.0,
    }
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width.saturating_sub(2)).max(10);
    let height = height.min(r.height.saturating_sub(2)).max(5);
    Rect {
        x: r.x + (r.width.saturating_sub(width) / 2),
        y: r.y + (r.height.saturating_sub(height) / 2),
        width,
        height,
    }
}

/// Range of list rows to render so the selection stays centred.
fn visible_window(total: usize, height: usize, selected: usize) -> (usize, usize) {
    if total <= height || height == 0 {
        return (0, total);
    }
    let start = selected.saturating_sub(height / 2).min(total - height);
    (start, start + height)
}

fn card<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.subtext))
        .title(title)
        .title_style(Style::default().fg(theme.accent))
        .style(theme.card())
        .padding(LEFT_PAD)
}

/// Render the entire UI into `frame`.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    player: &Coordinator,
    theme: &Theme,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
    now: Instant,
) {
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.primary_bg)),
        frame.area(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(card(" cadenza ", theme).title_alignment(Alignment::Center));
    frame.render_widget(header, chunks[0]);

    let elapsed = player.elapsed();
    let total = player.duration();
    let song = match player.current_track() {
        Some(track) => {
            let name = now_playing_track_text(track, ui_settings);
            match now_playing_time_text(elapsed, total, ui_settings) {
                Some(time) => format!("Song: {name} [{time}]"),
                None => format!("Song: {name}"),
            }
        }
        None => "No song playing".to_string(),
    };
    let now_playing = Paragraph::new(format!("{song}\n{}", status_text(player, app, now)))
        .block(card(" now playing ", theme))
        .wrap(Wrap { trim: true });
    frame.render_widget(now_playing, chunks[1]);

    draw_tracks(frame, chunks[2], app, player, theme);

    if app.metadata_window {
        draw_metadata(frame, chunks[2], app, player, theme);
    }

    let label = format!(
        "{} / {}",
        format_mmss(elapsed),
        total.map(format_mmss).unwrap_or_else(|| "--:--".to_string())
    );
    let gauge = Gauge::default()
        .block(card(" progress ", theme))
        .gauge_style(Style::default().fg(theme.accent).bg(theme.card_bg))
        .ratio(progress_ratio(elapsed, total))
        .label(label);
    frame.render_widget(gauge, chunks[3]);

    let queue = Paragraph::new(queue_text(player))
        .style(theme.muted())
        .block(card(" queue ", theme));
    frame.render_widget(queue, chunks[4]);

    let footer = Paragraph::new(controls_text(controls_settings))
        .style(theme.muted())
        .block(card(" controls ", theme))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[5]);
}

fn draw_tracks(frame: &mut Frame, area: Rect, app: &App, player: &Coordinator, theme: &Theme) {
    let tracks = player.catalog().tracks();
    let playing = player.current_track().map(|t| &t.path);

    // Only build ListItems for the visible rows.
    let (start, end) = visible_window(tracks.len(), area.height.saturating_sub(2) as usize, app.selected);
    let items: Vec<ListItem> = tracks[start..end]
        .iter()
        .map(|track| {
            if Some(&track.path) == playing {
                ListItem::new(format!("♪ {}", track.display)).style(Style::default().fg(theme.accent))
            } else {
                ListItem::new(format!("  {}", track.display))
            }
        })
        .collect();

    let title = if tracks.is_empty() {
        " tracks (none found) "
    } else {
        " tracks "
    };
    let list = List::new(items)
        .block(card(title, theme))
        .highlight_style(
            Style::default()
                .fg(theme.highlight)
                .add_modifier(Modifier::REVERSED | Modifier::BOLD),
        )
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if !tracks.is_empty() {
        state.select(Some(app.selected.saturating_sub(start)));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

/// Overlay with tag details for the track under the cursor; stays inside the list area.
fn draw_metadata(frame: &mut Frame, area: Rect, app: &App, player: &Coordinator, theme: &Theme) {
    let popup = centered_rect_sized(72, 9, area);
    frame.render_widget(Clear, popup);

    let meta = match player.catalog().get(app.selected) {
        Some(track) => format!(
            "Title: {}\nArtist: {}\nAlbum: {}\nDuration: {}\nPath: {}",
            track.title,
            track.artist.as_deref().unwrap_or("-"),
            track.album.as_deref().unwrap_or("-"),
            format_duration_mmss_ceil(track.duration),
            track.path.display()
        ),
        None => "No track selected".to_string(),
    };
    let paragraph = Paragraph::new(meta)
        .block(card(" metadata (K closes) ", theme))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, popup);
}
