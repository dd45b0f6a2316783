use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::news::markup::{parse_attributes, replace_guarded};
use crate::news::types::{VIDEO_CONTAINER_OPEN, VideoDescriptor};

use super::traits::{Rule, RuleContext};

static VIDEO_BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)\[video\b(?P<attrs>[^\]]*)\](?P<body>.*?)\[/video\]").expect("video block regex")
});

static VIDEO_ELEMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<video\b(?P<attrs>[^>]*)>(?P<body>.*?)</video>").expect("video element regex")
});

/// Playback attributes every inline video needs to behave like an animated image.
const REQUIRED_FLAGS: &[&str] = &["muted", "autoplay", "playsinline", "loop"];

/// `[video mp4=".." webm=".." poster=".." autoplay controls][/video]`
pub struct VideoBlocks;

impl Rule for VideoBlocks {
    fn name(&self) -> &'static str {
        "video-blocks"
    }

    fn apply(&self, input: &str, ctx: &mut RuleContext<'_>) -> String {
        VIDEO_BLOCK_RE
            .replace_all(input, |caps: &Captures| {
                match VideoDescriptor::from_attributes(&caps["attrs"], ctx.config) {
                    Some(video) => video.render(),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}

/// Literal `<video>` elements already present in the body.
pub struct EmbeddedVideos;

impl Rule for EmbeddedVideos {
    fn name(&self) -> &'static str {
        "embedded-videos"
    }

    fn apply(&self, input: &str, _ctx: &mut RuleContext<'_>) -> String {
        replace_guarded(
            &VIDEO_ELEMENT_RE,
            input,
            |text, caps| {
                let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
                !text[..start].ends_with(VIDEO_CONTAINER_OPEN)
            },
            |caps| {
                let attrs = &caps["attrs"];
                let present: Vec<String> = parse_attributes(attrs).into_iter().map(|(k, _)| k).collect();

                let mut open = attrs.trim_end().trim_end_matches('/').trim_end().to_string();
                for flag in REQUIRED_FLAGS {
                    if !present.iter().any(|p| p == flag) {
                        open.push(' ');
                        open.push_str(flag);
                    }
                }

                format!(
                    "{VIDEO_CONTAINER_OPEN}<video{open}>{body}</video></div>",
                    body = &caps["body"]
                )
            },
        )
    }
}
