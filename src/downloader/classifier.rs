// Stream classifier - turns raw yt-dlp formats into a selectable menu
//
// Two menu policies, never mixed:
// - per-stream: every video-only / audio-only stream is its own entry
// - resolution ladder: fixed rungs, each merging best video + best audio

use std::collections::HashSet;

use super::models::{Candidate, FormatRecord, LadderOption, MediaKind, Menu, MenuPolicy};

/// Rungs offered by the ladder policy, highest first
pub const LADDER_HEIGHTS: [u32; 6] = [2160, 1440, 1080, 720, 480, 360];

/// Selector for the constant best-audio ladder entry
pub const BEST_AUDIO_SELECTOR: &str = "bestaudio/best";

/// Split records into video-only and audio-only candidates.
///
/// Backend order is kept (yt-dlp lists worst to best). Muxed records and
/// records without any codec are dropped, as are repeated format ids.
pub fn classify(records: &[FormatRecord]) -> (Vec<Candidate>, Vec<Candidate>) {
    let mut video = Vec::new();
    let mut audio = Vec::new();
    let mut seen = HashSet::new();

    for record in records {
        let kind = match (record.has_video(), record.has_audio()) {
            (true, false) => MediaKind::Video,
            (false, true) => MediaKind::Audio,
            _ => continue,
        };

        if !seen.insert(record.format_id.as_str()) {
            continue;
        }

        let candidate = Candidate {
            id: record.format_id.clone(),
            extension: record.ext.clone(),
            display_label: label_for(record, kind),
            kind,
        };

        match kind {
            MediaKind::Video => video.push(candidate),
            MediaKind::Audio => audio.push(candidate),
        }
    }

    (video, audio)
}

fn label_for(record: &FormatRecord, kind: MediaKind) -> String {
    match kind {
        MediaKind::Video => format!(
            "Video: {} ({}) - ID:{}",
            resolution_text(record),
            record.ext,
            record.format_id
        ),
        MediaKind::Audio => format!(
            "Audio: {}kbps ({}) - ID:{}",
            record
                .abr
                .map(|abr| abr.to_string())
                .unwrap_or_else(|| "?".to_string()),
            record.ext,
            record.format_id
        ),
    }
}

fn resolution_text(record: &FormatRecord) -> String {
    if let Some(res) = record.resolution.as_deref().filter(|r| !r.is_empty()) {
        return res.to_string();
    }
    match record.height {
        Some(h) => format!("{}p", h),
        None => "unknown".to_string(),
    }
}

/// Build ladder options for the heights actually present in `records`.
///
/// Only records carrying video count; the best-audio entry is always last.
pub fn synthesize_ladder(records: &[FormatRecord]) -> Vec<LadderOption> {
    let available: HashSet<u32> = records
        .iter()
        .filter(|r| r.has_video())
        .filter_map(|r| r.height)
        .collect();

    let mut options: Vec<LadderOption> = LADDER_HEIGHTS
        .iter()
        .filter(|h| available.contains(h))
        .map(|&h| LadderOption {
            height: Some(h),
            label: format!("{}p (best video + best audio, mp4)", h),
            selector: ladder_selector(h),
        })
        .collect();

    options.push(LadderOption {
        height: None,
        label: "Audio only (best available, mp3)".to_string(),
        selector: BEST_AUDIO_SELECTOR.to_string(),
    });

    options
}

/// Height-bounded "best video + best audio" expression
pub fn ladder_selector(height: u32) -> String {
    format!("bestvideo[height<={}]+bestaudio/best", height)
}

/// Build the menu with one explicit policy
pub fn build_menu(records: &[FormatRecord], policy: MenuPolicy) -> Menu {
    match policy {
        MenuPolicy::PerStream => {
            let (video, audio) = classify(records);
            Menu::PerStream { video, audio }
        }
        MenuPolicy::ResolutionLadder => Menu::Ladder {
            options: synthesize_ladder(records),
        },
    }
}
