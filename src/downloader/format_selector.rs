// FormatSelector - turns a menu choice into a yt-dlp format expression
//
// Per-stream picks become "{video}+{audio}" or a bare format id; ladder
// picks become height-bounded bestvideo/bestaudio expressions. The output
// also fixes the container extension, merge flag and post-processor.

use super::classifier::{ladder_selector, BEST_AUDIO_SELECTOR};
use super::errors::{GrabError, Result};
use super::models::{
    Candidate, LadderOption, MediaKind, Menu, OutputTarget, PostProcessor, Selection,
    SelectionMode, SelectorPlan,
};

/// Container used whenever video and audio get merged
pub const MERGE_CONTAINER: &str = "mp4";

/// Default bitrate for mp3 extraction
pub const DEFAULT_MP3_QUALITY_KBPS: u32 = 192;

#[derive(Debug, Clone, Copy)]
pub struct FormatSelector {
    mp3_quality_kbps: u32,
}

impl Default for FormatSelector {
    fn default() -> Self {
        Self {
            mp3_quality_kbps: DEFAULT_MP3_QUALITY_KBPS,
        }
    }
}

impl FormatSelector {
    pub fn new(mp3_quality_kbps: u32) -> Self {
        Self { mp3_quality_kbps }
    }

    /// Build a plan from explicit per-stream candidates
    pub fn build(
        &self,
        mode: SelectionMode,
        video: Option<&Candidate>,
        audio: Option<&Candidate>,
    ) -> Result<SelectorPlan> {
        match mode {
            SelectionMode::CombinedBestQuality => {
                let video = require(video, MediaKind::Video, mode)?;
                let audio = require(audio, MediaKind::Audio, mode)?;
                Ok(SelectorPlan {
                    selector: format!("{}+{}", video.id, audio.id),
                    output_extension: MERGE_CONTAINER.to_string(),
                    merge_required: true,
                    post_processor: PostProcessor::None,
                    output: OutputTarget::Fixed {
                        extension: MERGE_CONTAINER.to_string(),
                    },
                    kind: MediaKind::Video,
                })
            }
            SelectionMode::VideoOnly => {
                let video = require(video, MediaKind::Video, mode)?;
                Ok(single_stream_plan(video))
            }
            SelectionMode::AudioOnly => {
                let audio = require(audio, MediaKind::Audio, mode)?;
                Ok(single_stream_plan(audio))
            }
        }
    }

    /// Build a plan from a synthesized ladder entry
    pub fn build_ladder(&self, option: &LadderOption) -> SelectorPlan {
        match option.height {
            Some(height) => SelectorPlan {
                selector: ladder_selector(height),
                output_extension: MERGE_CONTAINER.to_string(),
                merge_required: true,
                // the "/best" fallback may pick a non-mp4 muxed stream
                post_processor: PostProcessor::TranscodeToMp4,
                output: OutputTarget::Template,
                kind: MediaKind::Video,
            },
            None => SelectorPlan {
                selector: BEST_AUDIO_SELECTOR.to_string(),
                output_extension: "mp3".to_string(),
                merge_required: false,
                post_processor: PostProcessor::ExtractAudioToMp3 {
                    quality_kbps: self.mp3_quality_kbps,
                },
                output: OutputTarget::Template,
                kind: MediaKind::Audio,
            },
        }
    }

    /// Resolve a UI selection against the menu it was made from
    pub fn resolve(&self, menu: &Menu, selection: &Selection) -> Result<SelectorPlan> {
        match menu {
            Menu::PerStream { video, audio } => {
                let chosen_video = if selection.mode.needs_video() {
                    Some(pick(video, selection.video_id.as_deref(), MediaKind::Video)?)
                } else {
                    None
                };
                let chosen_audio = if selection.mode.needs_audio() {
                    Some(pick(audio, selection.audio_id.as_deref(), MediaKind::Audio)?)
                } else {
                    None
                };

                self.build(selection.mode, chosen_video, chosen_audio)
            }
            Menu::Ladder { options } => {
                let option = match selection.mode {
                    SelectionMode::VideoOnly => {
                        return Err(GrabError::InvalidSelection(
                            "video-only is not offered by the resolution ladder".to_string(),
                        ))
                    }
                    SelectionMode::AudioOnly => options.iter().find(|o| o.is_audio()),
                    SelectionMode::CombinedBestQuality => match selection.height {
                        Some(h) => options.iter().find(|o| o.height == Some(h)),
                        None => options.iter().find(|o| !o.is_audio()),
                    },
                };

                option.map(|o| self.build_ladder(o)).ok_or_else(|| {
                    GrabError::InvalidSelection(match selection.height {
                        Some(h) if selection.mode == SelectionMode::CombinedBestQuality => {
                            format!("{}p is not on the menu", h)
                        }
                        _ => format!("no option available for {:?}", selection.mode),
                    })
                })
            }
        }
    }
}

fn single_stream_plan(candidate: &Candidate) -> SelectorPlan {
    SelectorPlan {
        selector: candidate.id.clone(),
        output_extension: candidate.extension.clone(),
        merge_required: false,
        post_processor: PostProcessor::None,
        output: OutputTarget::Fixed {
            extension: candidate.extension.clone(),
        },
        kind: candidate.kind,
    }
}

fn require(
    candidate: Option<&Candidate>,
    kind: MediaKind,
    mode: SelectionMode,
) -> Result<&Candidate> {
    match candidate {
        Some(c) if c.kind == kind => Ok(c),
        Some(c) => Err(GrabError::InvalidSelection(format!(
            "format {} is {:?}, {:?} needs a {:?} stream",
            c.id, c.kind, mode, kind
        ))),
        None => Err(GrabError::InvalidSelection(format!(
            "{:?} needs a {:?} stream but none was chosen",
            mode, kind
        ))),
    }
}

fn pick<'a>(list: &'a [Candidate], id: Option<&str>, kind: MediaKind) -> Result<&'a Candidate> {
    if list.is_empty() {
        return Err(GrabError::InvalidSelection(format!(
            "no {:?} streams available",
            kind
        )));
    }

    match id {
        Some(id) => list.iter().find(|c| c.id == id).ok_or_else(|| {
            GrabError::InvalidSelection(format!("{:?} format {} is not on the menu", kind, id))
        }),
        None => Ok(&list[0]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downloader::classifier::tests::{audio_record, video_record};
    use crate::downloader::classifier::{build_menu, classify};
    use crate::downloader::models::MenuPolicy;

    fn scenario_menu() -> Menu {
        build_menu(
            &[video_record("137", "mp4", 1080), audio_record("140", "m4a", 128.0)],
            MenuPolicy::PerStream,
        )
    }

    #[test]
    fn test_combined_selector() {
        let plan = FormatSelector::default()
            .resolve(&scenario_menu(), &Selection::combined("137", "140"))
            .unwrap();
        assert_eq!(plan.selector, "137+140");
        assert_eq!(plan.output_extension, "mp4");
        assert!(plan.merge_required);
        assert_eq!(plan.post_processor, PostProcessor::None);
        assert_eq!(plan.kind, MediaKind::Video);
    }

    #[test]
    fn test_video_only_selector() {
        let plan = FormatSelector::default()
            .resolve(&scenario_menu(), &Selection::video_only("137"))
            .unwrap();
        assert_eq!(plan.selector, "137");
        assert_eq!(plan.output_extension, "mp4");
        assert!(!plan.merge_required);
        assert_eq!(
            plan.output,
            OutputTarget::Fixed {
                extension: "mp4".to_string()
            }
        );
    }

    #[test]
    fn test_audio_only_keeps_native_extension() {
        let plan = FormatSelector::default()
            .resolve(&scenario_menu(), &Selection::audio_only("140"))
            .unwrap();
        assert_eq!(plan.selector, "140");
        assert_eq!(plan.output_extension, "m4a");
        assert_eq!(plan.kind, MediaKind::Audio);
    }

    #[test]
    fn test_combined_without_video_is_invalid() {
        let menu = build_menu(&[audio_record("140", "m4a", 128.0)], MenuPolicy::PerStream);
        let err = FormatSelector::default()
            .resolve(&menu, &Selection::defaults(SelectionMode::CombinedBestQuality))
            .unwrap_err();
        assert!(matches!(err, GrabError::InvalidSelection(_)));
    }

    #[test]
    fn test_combined_without_audio_candidate_is_invalid() {
        let (video, _) = classify(&[video_record("137", "mp4", 1080)]);
        let err = FormatSelector::default()
            .build(SelectionMode::CombinedBestQuality, video.first(), None)
            .unwrap_err();
        assert!(matches!(err, GrabError::InvalidSelection(_)));
    }

    #[test]
    fn test_swapped_kinds_are_invalid() {
        let (video, audio) = classify(&[
            video_record("137", "mp4", 1080),
            audio_record("140", "m4a", 128.0),
        ]);
        let err = FormatSelector::default()
            .build(SelectionMode::CombinedBestQuality, audio.first(), video.first())
            .unwrap_err();
        assert!(matches!(err, GrabError::InvalidSelection(_)));
    }

    #[test]
    fn test_unknown_id_is_invalid() {
        let err = FormatSelector::default()
            .resolve(&scenario_menu(), &Selection::video_only("999"))
            .unwrap_err();
        assert!(matches!(err, GrabError::InvalidSelection(_)));
    }

    #[test]
    fn test_defaults_pick_first_listed() {
        let menu = build_menu(
            &[
                video_record("134", "mp4", 360),
                video_record("137", "mp4", 1080),
                audio_record("139", "m4a", 48.0),
                audio_record("140", "m4a", 128.0),
            ],
            MenuPolicy::PerStream,
        );
        let plan = FormatSelector::default()
            .resolve(&menu, &Selection::defaults(SelectionMode::CombinedBestQuality))
            .unwrap();
        assert_eq!(plan.selector, "134+139");
    }

    #[test]
    fn test_audio_only_ignores_empty_video_list() {
        let menu = build_menu(&[audio_record("140", "m4a", 128.0)], MenuPolicy::PerStream);
        let selector = FormatSelector::default();

        let plan = selector
            .resolve(&menu, &Selection::defaults(SelectionMode::AudioOnly))
            .unwrap();
        assert_eq!(plan.selector, "140");

        let err = selector
            .resolve(&menu, &Selection::defaults(SelectionMode::CombinedBestQuality))
            .unwrap_err();
        assert!(matches!(err, GrabError::InvalidSelection(_)));
    }

    #[test]
    fn test_builder_is_deterministic() {
        let selector = FormatSelector::default();
        let menu = scenario_menu();
        let a = selector.resolve(&menu, &Selection::combined("137", "140")).unwrap();
        let b = selector.resolve(&menu, &Selection::combined("137", "140")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_ladder_rung() {
        let menu = build_menu(
            &[video_record("137", "mp4", 1080), video_record("136", "mp4", 720)],
            MenuPolicy::ResolutionLadder,
        );
        let plan = FormatSelector::default()
            .resolve(&menu, &Selection::ladder(Some(720)))
            .unwrap();
        assert_eq!(plan.selector, "bestvideo[height<=720]+bestaudio/best");
        assert_eq!(plan.output_extension, "mp4");
        assert!(plan.merge_required);
        assert_eq!(plan.post_processor, PostProcessor::TranscodeToMp4);
        assert_eq!(plan.output, OutputTarget::Template);

        let top = FormatSelector::default()
            .resolve(&menu, &Selection::defaults(SelectionMode::CombinedBestQuality))
            .unwrap();
        assert_eq!(top.selector, "bestvideo[height<=1080]+bestaudio/best");
    }

    #[test]
    fn test_ladder_audio_extracts_mp3() {
        let menu = build_menu(&[video_record("137", "mp4", 1080)], MenuPolicy::ResolutionLadder);
        let plan = FormatSelector::new(256)
            .resolve(&menu, &Selection::ladder(None))
            .unwrap();
        assert_eq!(plan.selector, "bestaudio/best");
        assert_eq!(plan.output_extension, "mp3");
        assert_eq!(
            plan.post_processor,
            PostProcessor::ExtractAudioToMp3 { quality_kbps: 256 }
        );
    }

    #[test]
    fn test_ladder_rejects_missing_height_and_video_only() {
        let menu = build_menu(&[video_record("137", "mp4", 1080)], MenuPolicy::ResolutionLadder);
        let selector = FormatSelector::default();
        assert!(matches!(
            selector.resolve(&menu, &Selection::ladder(Some(480))),
            Err(GrabError::InvalidSelection(_))
        ));
        assert!(matches!(
            selector.resolve(&menu, &Selection::defaults(SelectionMode::VideoOnly)),
            Err(GrabError::InvalidSelection(_))
        ));
    }

    #[test]
    fn test_empty_ladder_combined_is_invalid() {
        let menu = build_menu(&[audio_record("140", "m4a", 128.0)], MenuPolicy::ResolutionLadder);
        assert!(matches!(
            FormatSelector::default()
                .resolve(&menu, &Selection::defaults(SelectionMode::CombinedBestQuality)),
            Err(GrabError::InvalidSelection(_))
        ));
    }
}
