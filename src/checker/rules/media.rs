use crate::checker::css::contains_any;
use crate::checker::Checker;
use crate::domain::models::{Issue, IssueType};
use crate::extractor::{Document, ElementExt};
use scraper::ElementRef;

/// Images without an `alt` attribute. An empty `alt` marks a decorative image and passes.
pub struct AltTextChecker;

impl Checker for AltTextChecker {
    fn name(&self) -> &'static str {
        "AltText"
    }

    fn check(&self, document: &Document) -> Vec<Issue> {
        document
            .elements_by_tag("img")
            .filter(|img| !img.has_attr("alt"))
            .map(|img| Issue::new(IssueType::AltTextMissing, img.snippet()))
            .collect()
    }
}

const TRANSCRIPT_KEYWORDS: &[&str] = &[
    "transcript",
    "captions",
    "subtitles",
    "subtitle",
    "caption",
    "closed caption",
    "cc",
    "accessibility",
    "audio description",
    "text version",
    "text alternative",
    "read transcript",
];

/// Video and audio without captions, a text description or a nearby transcript link.
///
/// All videos are reported before any audio element.
pub struct CaptionsChecker;

impl CaptionsChecker {
    fn has_captions(media: &ElementRef<'_>) -> bool {
        let has_caption_track = media.descendant_elements().iter().any(|el| {
            el.tag() == "track" && matches!(el.attr_or_empty("kind"), "captions" | "subtitles")
        });
        if has_caption_track {
            return true;
        }

        let described = ["aria-describedby", "aria-label", "aria-labelledby"]
            .iter()
            .any(|attr| !media.attr_or_empty(attr).trim().is_empty());
        if described {
            return true;
        }

        Self::has_transcript_link(media)
    }

    /// Looks for transcript anchors or buttons inside the parent, which covers every sibling.
    fn has_transcript_link(media: &ElementRef<'_>) -> bool {
        let Some(parent) = media.parent_element() else {
            return false;
        };

        parent.descendant_elements().iter().any(|el| match el.tag() {
            "a" => {
                contains_any(&el.trimmed_text().to_lowercase(), TRANSCRIPT_KEYWORDS)
                    || contains_any(&el.attr_or_empty("href").to_lowercase(), TRANSCRIPT_KEYWORDS)
            }
            "button" => contains_any(&el.trimmed_text().to_lowercase(), TRANSCRIPT_KEYWORDS),
            _ => false,
        })
    }
}

impl Checker for CaptionsChecker {
    fn name(&self) -> &'static str {
        "Captions"
    }

    fn check(&self, document: &Document) -> Vec<Issue> {
        document
            .elements_by_tag("video")
            .chain(document.elements_by_tag("audio"))
            .filter(|media| !Self::has_captions(media))
            .map(|media| Issue::new(IssueType::CaptionsForVideoAudioMissing, media.snippet()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::mocks;

    #[test]
    fn test_images_without_alt() {
        let document = Document::parse(&mocks::five_images_html());
        let issues = AltTextChecker.check(&document);

        assert_eq!(issues.len(), 3);
        assert_eq!(issues[0].html_snippet, r#"<img src="img_2.jpg"/>"#);
        assert_eq!(issues[1].html_snippet, r#"<img src="img_4.jpg"/>"#);
        assert_eq!(issues[2].html_snippet, r#"<img src="img_5.jpg"/>"#);
        for issue in &issues {
            assert_eq!(issue.issue_type, IssueType::AltTextMissing);
            assert_eq!(issue.id, -1);
            assert_eq!(issue.scan_id, -1);
        }
    }

    #[test]
    fn test_empty_alt_is_decorative() {
        let document = Document::parse(r#"<img src="spacer.gif" alt="">"#);
        assert!(AltTextChecker.check(&document).is_empty());
    }

    #[test]
    fn test_video_audio_without_captions() {
        let html = r#"<body>
            <h1>Media Test Page</h1>
            <video src="video1.mp4" controls></video>
            <audio src="audio1.mp3" controls></audio>
            <video src="video2.mp4" controls>
              <track kind="captions" src="captions.vtt" srclang="en" label="English">
            </video>
            <audio src="audio2.mp3" controls aria-describedby="transcript1"></audio>
            <div id="transcript1">This is a transcript of the audio content.</div>
        </body>"#;
        let document = Document::parse(html);
        let issues = CaptionsChecker.check(&document);

        assert_eq!(issues.len(), 2);
        assert!(issues[0].html_snippet.contains("video1.mp4"));
        assert!(issues[1].html_snippet.contains("audio1.mp3"));
    }

    #[test]
    fn test_transcript_link_next_to_video() {
        let html = r#"<body>
            <div>
              <video src="video1.mp4" controls></video>
              <p><a href="transcript.html">Read Transcript</a></p>
            </div>
            <div>
              <audio src="audio1.mp3" controls></audio>
            </div>
        </body>"#;
        let document = Document::parse(html);
        let issues = CaptionsChecker.check(&document);

        assert_eq!(issues.len(), 1);
        assert!(issues[0].html_snippet.contains("audio1.mp3"));
    }

    #[test]
    fn test_caption_button_counts_as_alternative() {
        let html = r#"<body>
            <div><audio src="audio1.mp3" controls></audio><button>View Captions</button></div>
            <div><video src="video1.mp4" controls></video></div>
        </body>"#;
        let document = Document::parse(html);
        let issues = CaptionsChecker.check(&document);

        assert_eq!(issues.len(), 1);
        assert!(issues[0].html_snippet.contains("video1.mp4"));
    }

    #[test]
    fn test_page_without_media() {
        let document = Document::parse(r#"<body><p>No media</p><img src="image.jpg" alt="Test image"></body>"#);
        assert!(CaptionsChecker.check(&document).is_empty());
    }
}
