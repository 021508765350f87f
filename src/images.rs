//! Slide images: fuzzy match against a local folder, else a Pexels download.

use crate::config::Config;
use crate::error::{Error, Result};
use log::{info, warn};
use reqwest::Url;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

const PEXELS_ENDPOINT: &str = "https://api.pexels.com/v1/search";
const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "bmp"];
/// Minimum score for a local file to count as a match.
const MATCH_THRESHOLD: f32 = 0.3;
const WORD_BONUS: f32 = 0.2;
/// Sequences at least this long have their most frequent characters ignored
/// when seeding matches.
const AUTOJUNK_MIN_LEN: usize = 200;

/// Anything that can find an image file for a slide title.
pub trait ImageSource {
    /// Path of an image for `query`, or `None` when nothing suitable exists.
    fn fetch(&self, query: &str) -> Option<PathBuf>;
}

/// Similarity of `query` to a file stem: character ratio plus a bonus per shared word.
pub fn match_score(query: &str, stem: &str) -> f32 {
    let query = query.to_lowercase();
    let stem = stem.to_lowercase();
    let ratio = sequence_ratio(&query, &stem);

    let query_words: HashSet<&str> = query.split_whitespace().collect();
    let shared = stem
        .split_whitespace()
        .collect::<HashSet<_>>()
        .intersection(&query_words)
        .count();
    ratio + shared as f32 * WORD_BONUS
}

/// Ratcliff/Obershelp similarity: twice the matched characters over the total length.
///
/// Matching blocks are found by taking the longest common run and recursing on
/// both sides of it, earliest run first on ties.
pub fn sequence_ratio(a: &str, b: &str) -> f32 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let b2j = index_positions(&b);
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, k) = longest_match(&a, &b, &b2j, (alo, ahi), (blo, bhi));
        if k == 0 {
            continue;
        }
        matched += k;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            pending.push((i + k, ahi, j + k, bhi));
        }
    }
    2.0 * matched as f32 / total as f32
}

/// Positions of every character of `b`, ascending. In long sequences the
/// characters making up more than 1% of it are left out.
fn index_positions(b: &[char]) -> HashMap<char, Vec<usize>> {
    let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, c) in b.iter().enumerate() {
        b2j.entry(*c).or_default().push(j);
    }
    if b.len() >= AUTOJUNK_MIN_LEN {
        let limit = b.len() / 100 + 1;
        b2j.retain(|_, positions| positions.len() <= limit);
    }
    b2j
}

/// Longest common run of `a[alo..ahi]` and `b[blo..bhi]` as `(i, j, len)`.
fn longest_match(
    a: &[char],
    b: &[char],
    b2j: &HashMap<char, Vec<usize>>,
    (alo, ahi): (usize, usize),
    (blo, bhi): (usize, usize),
) -> (usize, usize, usize) {
    let (mut besti, mut bestj, mut best) = (alo, blo, 0);
    let mut run_ending_at: HashMap<usize, usize> = HashMap::new();
    for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next: HashMap<usize, usize> = HashMap::new();
        for &j in b2j.get(c).map_or(&[][..], Vec::as_slice) {
            if j < blo {
                continue;
            }
            if j >= bhi {
                break;
            }
            let k = j.checked_sub(1).and_then(|prev| run_ending_at.get(&prev)).copied().unwrap_or(0) + 1;
            next.insert(j, k);
            if k > best {
                (besti, bestj, best) = (i + 1 - k, j + 1 - k, k);
            }
        }
        run_ending_at = next;
    }

    // Characters dropped from the index can still extend a run.
    while besti > alo && bestj > blo && a[besti - 1] == b[bestj - 1] {
        besti -= 1;
        bestj -= 1;
        best += 1;
    }
    while besti + best < ahi && bestj + best < bhi && a[besti + best] == b[bestj + best] {
        best += 1;
    }
    (besti, bestj, best)
}

/// Best scoring image in `dir`, visited in file name order; ties keep the first.
pub fn best_local_match(query: &str, dir: &Path) -> Option<PathBuf> {
    let entries = fs::read_dir(dir).ok()?;
    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && has_image_extension(path))
        .collect();
    candidates.sort();

    let mut best: Option<(f32, PathBuf)> = None;
    for path in candidates {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let score = match_score(query, stem);
        if best.as_ref().is_none_or(|(best_score, _)| score > *best_score) {
            best = Some((score, path));
        }
    }

    best.filter(|(score, _)| *score > MATCH_THRESHOLD).map(|(score, path)| {
        info!("Found existing image {} (similarity {:.2})", path.display(), score);
        path
    })
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}

/// File name used for a downloaded image: alphanumerics, spaces and `_` only.
pub fn safe_file_name(query: &str) -> String {
    let name: String = query
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '_')
        .collect();
    let name = name.trim_end();
    if name.is_empty() {
        "image.jpg".to_string()
    } else {
        format!("{}.jpg", name)
    }
}

#[derive(Deserialize)]
struct PexelsResponse {
    #[serde(default)]
    photos: Vec<PexelsPhoto>,
}

#[derive(Deserialize)]
struct PexelsPhoto {
    src: PexelsSources,
}

#[derive(Deserialize)]
struct PexelsSources {
    original: String,
}

/// Local folder first, Pexels second.
pub struct ImageClient {
    client: Client,
    api_key: Option<String>,
    dir: PathBuf,
}

impl ImageClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder().timeout(config.http_timeout).build()?;
        Ok(Self {
            client,
            api_key: config.pexels_api_key.clone(),
            dir: config.images_dir.clone(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn download(&self, query: &str, api_key: &str) -> Result<Option<PathBuf>> {
        let url = Url::parse_with_params(PEXELS_ENDPOINT, &[("query", query), ("per_page", "1")])
            .map_err(|e| Error::Image(format!("Pexels URL: {}", e)))?;
        let found: PexelsResponse = self
            .client
            .get(url)
            .header("Authorization", api_key)
            .send()?
            .error_for_status()?
            .json()?;

        let Some(photo) = found.photos.into_iter().next() else {
            warn!("No Pexels images found for {:?}", query);
            return Ok(None);
        };

        let bytes = self.client.get(&photo.src.original).send()?.error_for_status()?.bytes()?;
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(safe_file_name(query));
        fs::write(&path, &bytes)?;
        info!("Image downloaded to {}", path.display());
        Ok(Some(path))
    }
}

impl ImageSource for ImageClient {
    fn fetch(&self, query: &str) -> Option<PathBuf> {
        if let Some(path) = best_local_match(query, &self.dir) {
            return Some(path);
        }

        let Some(api_key) = self.api_key.as_deref() else {
            warn!("No PEXELS_API_KEY and no matching local image for {:?}", query);
            return None;
        };

        self.download(query, api_key).unwrap_or_else(|e| {
            warn!("Pexels failed for {:?}: {}", query, e);
            None
        })
    }
}
