use std::time::Duration;

pub const GOAL_COUNT: u64 = 2_500_000;
pub const GROUP_NAME: &str = "ReGLOSS";

pub const SERVER_PORT: u16 = 3000;
pub const SERVICE_NAME: &str = "regloss-goal";
pub const TRACER_NAME: &str = "regloss-goal-tracer";

pub const YOUTUBE_API_BASE: &str = "https://www.googleapis.com";
pub const YOUTUBE_URN_CHANNELS: &str = "youtube/v3/channels";

/// Single key holding the serialized `{count, expiry}` record
pub const CACHE_KEY: &str = "regloss:subscribers:total";
pub const CACHE_TTL: Duration = Duration::from_secs(10 * 60);

pub const AVATAR_SIZE: u16 = 176;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channel {
    pub id: &'static str,
    pub name: &'static str,
    pub avatar: &'static str,
    pub url: &'static str,
}

pub const CHANNELS: [Channel; 5] = [
    Channel {
        id: "UCMGfV7TVTmHhEErVJg1oHBQ",
        name: "Hiodoshi Ao",
        avatar: "https://yt3.googleusercontent.com/-D2Cf4dIQGO_CcY_1F9i63TcHyY0EuPV1pYskJQmQHIClJGOt34BoI84zlgje_THCw8AprB6=s176-c-k-c0x00ffffff-no-rj",
        url: "https://www.youtube.com/@HiodoshiAo",
    },
    Channel {
        id: "UCWQtYtq9EOB4-I5P-3fh8lA",
        name: "Otonose Kanade",
        avatar: "https://yt3.googleusercontent.com/o03i3rWw98BSquRZFhyiDQuunr1cr_9xEBVNNx3Cq8vqlJZVKXMgKsVLGW2AlbsFTvphGiHRCg0=s176-c-k-c0x00ffffff-no-rj",
        url: "https://www.youtube.com/@OtonoseKanade",
    },
    Channel {
        id: "UCtyWhCj3AqKh2dXctLkDtng",
        name: "Ichijou Ririka",
        avatar: "https://yt3.googleusercontent.com/TQwdYxMCQYmBQskSxmdAbfAqRR__ROlB-mFGlCFqLF4C-6vHpjYkWj9GbnlKOoOTaOMssRGw=s176-c-k-c0x00ffffff-no-rj",
        url: "https://www.youtube.com/@IchijouRirika",
    },
    Channel {
        id: "UCdXAk5MpyLD8594lm_OvtGQ",
        name: "Juufuutei Raden",
        avatar: "https://yt3.googleusercontent.com/MrOx47-A0RkLxHN5Wh8stc3SYfbPGNHdJY9AnjD5mRkuKYVeYjxlBSnzKHtqTjDQ3Lm_MRCjcA=s176-c-k-c0x00ffffff-no-rj",
        url: "https://www.youtube.com/@JuufuuteiRaden",
    },
    Channel {
        id: "UC1iA6_NT4mtAcIII6ygrvCw",
        name: "Todoroki Hajime",
        avatar: "https://yt3.googleusercontent.com/vMM_SKbkipyDVJkUYPPWlQkgThE1rXMSh7hkhqvC_Qs-iTigfyKW23OfLH5U1HFTZIcsHR2Z=s176-c-k-c0x00ffffff-no-rj",
        url: "https://www.youtube.com/@TodorokiHajime",
    },
];

pub fn channel_ids() -> Vec<&'static str> {
    CHANNELS.iter().map(|ch| ch.id).collect()
}
