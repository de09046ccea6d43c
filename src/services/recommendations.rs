use serde::{Deserialize, Serialize};

pub const MAX_RECOMMENDATIONS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecommendation {
    pub title: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
}

struct Resource {
    title: &'static str,
    url: &'static str,
    kind: &'static str,
}

const INSOMNIA: &[Resource] = &[
    Resource {
        title: "Relaxing Sleep Music Playlist",
        url: "https://open.spotify.com/playlist/37i9dQZF1DWZd79rJ6a7lp",
        kind: "playlist",
    },
    Resource {
        title: "Sleep Meditation (10 min)",
        url: "https://www.youtube.com/watch?v=aEqlQvczMJQ",
        kind: "video",
    },
    Resource {
        title: "Tips for Better Sleep",
        url: "https://www.sleepfoundation.org/sleep-hygiene",
        kind: "article",
    },
];

const STRESS: &[Resource] = &[
    Resource {
        title: "Calm & Relaxing Music",
        url: "https://open.spotify.com/playlist/37i9dQZF1DWXe9gFZP0gtP",
        kind: "playlist",
    },
    Resource {
        title: "5-Minute Stress Relief",
        url: "https://www.youtube.com/watch?v=inpok4MKVLM",
        kind: "video",
    },
    Resource {
        title: "Guided Breathing Exercise",
        url: "https://www.youtube.com/watch?v=tEmt1Znux58",
        kind: "video",
    },
];

const ANXIETY: &[Resource] = &[
    Resource {
        title: "Anxiety Relief Playlist",
        url: "https://open.spotify.com/playlist/37i9dQZF1DX3Ogo9pFvBkY",
        kind: "playlist",
    },
    Resource {
        title: "Grounding Techniques",
        url: "https://www.youtube.com/watch?v=30VMIEmA114",
        kind: "video",
    },
    Resource {
        title: "Understanding Anxiety",
        url: "https://www.mind.org.uk/information-support/types-of-mental-health-problems/anxiety-and-panic-attacks/",
        kind: "article",
    },
];

const SADNESS: &[Resource] = &[
    Resource {
        title: "Uplifting Music Playlist",
        url: "https://open.spotify.com/playlist/37i9dQZF1DX3rxVfibe1L0",
        kind: "playlist",
    },
    Resource {
        title: "Mood Boosting Activities",
        url: "https://www.youtube.com/watch?v=F28MGLlpP90",
        kind: "video",
    },
];

const LONELINESS: &[Resource] = &[
    Resource {
        title: "Feel-Good Music",
        url: "https://open.spotify.com/playlist/37i9dQZF1DX9XIFQuFvzM4",
        kind: "playlist",
    },
    Resource {
        title: "Self-Compassion Meditation",
        url: "https://www.youtube.com/watch?v=QT9OMhuGjrc",
        kind: "video",
    },
];

fn resources_for(issue: &str) -> &'static [Resource] {
    match issue {
        "insomnia" => INSOMNIA,
        "stress" => STRESS,
        "anxiety" => ANXIETY,
        "sadness" => SADNESS,
        "loneliness" => LONELINESS,
        _ => &[],
    }
}

/// Pick resources for the detected issues, falling back on the emotion when no
/// issue matched. At most [`MAX_RECOMMENDATIONS`] are returned.
pub fn recommend(detected_issues: &[String], emotion: &str) -> Vec<ContentRecommendation> {
    let mut picked: Vec<&Resource> = detected_issues
        .iter()
        .flat_map(|issue| resources_for(&issue.to_lowercase()))
        .collect();

    if picked.is_empty() {
        picked = match emotion {
            "anxious" => ANXIETY.iter().collect(),
            "sad" => SADNESS.iter().collect(),
            _ => Vec::new(),
        };
    }

    picked
        .into_iter()
        .take(MAX_RECOMMENDATIONS)
        .map(|r| ContentRecommendation {
            title: r.title.to_string(),
            url: r.url.to_string(),
            kind: r.kind.to_string(),
        })
        .collect()
}
