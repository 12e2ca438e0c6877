//! Job-page detection and title matching heuristics.
//!
//! Two checks are applied to every fetched page:
//!
//! - [`JobPageClassifier::is_job_page`] - does the URL or visible text
//!   mention a careers keyword?
//! - [`JobPageClassifier::matches_job_title`] - does a desired title appear
//!   as whole words with hiring vocabulary close by?
//!
//! The context check keeps pages that mention a title in passing (a blog
//! post about "software") from counting as a listing.

use crate::html::extract_visible_text;
use crate::types::PageContent;

/// Keywords that mark a URL or page as careers-related.
pub const JOB_PAGE_KEYWORDS: &[&str] = &[
    "careers",
    "jobs",
    "join-us",
    "employment",
    "opportunities",
    "work-with-us",
    "hiring",
];

/// Hiring vocabulary that must appear near a matched title.
pub const CONTEXT_WORDS: &[&str] = &[
    "apply",
    "opening",
    "position",
    "role",
    "responsibilities",
    "full-time",
    "part-time",
    "hiring",
    "join",
    "career",
    "benefits",
];

/// Tokens searched on each side of a matched title.
pub const CONTEXT_WINDOW: usize = 8;

/// Keyword tables used by the classifier.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    pub job_page_keywords: Vec<String>,
    pub context_words: Vec<String>,
    pub context_window: usize,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            job_page_keywords: JOB_PAGE_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            context_words: CONTEXT_WORDS.iter().map(|s| s.to_string()).collect(),
            context_window: CONTEXT_WINDOW,
        }
    }
}

impl Vocabulary {
    /// Replace the job-page keywords.
    pub fn with_job_page_keywords(
        mut self,
        keywords: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.job_page_keywords = keywords.into_iter().map(|k| k.into().to_lowercase()).collect();
        self
    }

    /// Replace the context words.
    pub fn with_context_words(
        mut self,
        words: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.context_words = words.into_iter().map(|w| w.into().to_lowercase()).collect();
        self
    }

    /// Set the context window size.
    pub fn with_context_window(mut self, window: usize) -> Self {
        self.context_window = window;
        self
    }
}

/// Classifies pages as careers pages and checks title matches.
#[derive(Debug, Clone)]
pub struct JobPageClassifier {
    job_page_keywords: Vec<String>,
    /// Context words pre-split into tokens ("full-time" -> ["full", "time"])
    context_phrases: Vec<Vec<String>>,
    context_window: usize,
}

impl Default for JobPageClassifier {
    fn default() -> Self {
        Self::new(Vocabulary::default())
    }
}

impl JobPageClassifier {
    pub fn new(vocabulary: Vocabulary) -> Self {
        let context_phrases = vocabulary
            .context_words
            .iter()
            .map(|w| {
                tokenize(&w.to_lowercase())
                    .into_iter()
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .filter(|tokens| !tokens.is_empty())
            .collect();

        Self {
            job_page_keywords: vocabulary
                .job_page_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
            context_phrases,
            context_window: vocabulary.context_window,
        }
    }

    /// True when the URL names a careers keyword.
    pub fn url_has_keyword(&self, url: &str) -> bool {
        let url = url.to_lowercase();
        self.job_page_keywords.iter().any(|kw| url.contains(kw.as_str()))
    }

    /// True if `url` or the visible text of `body` contains a job-page keyword.
    pub fn is_job_page(&self, url: &str, body: &str) -> bool {
        if self.url_has_keyword(url) {
            return true;
        }
        self.text_has_keyword(&extract_visible_text(body))
    }

    /// Same as [`Self::is_job_page`] on an already-extracted page.
    pub fn is_job_page_content(&self, page: &PageContent) -> bool {
        self.url_has_keyword(&page.url) || self.text_has_keyword(&page.visible_text)
    }

    /// True if any desired title appears with hiring context nearby.
    ///
    /// An empty (or all-blank) title list means no filter and always matches.
    pub fn matches_job_title<S: AsRef<str>>(&self, body: &str, titles: &[S]) -> bool {
        if !has_filter(titles) {
            return true;
        }
        self.text_matches_title(&extract_visible_text(body), titles)
    }

    /// Same as [`Self::matches_job_title`] on an already-extracted page.
    pub fn matches_job_title_content<S: AsRef<str>>(
        &self,
        page: &PageContent,
        titles: &[S],
    ) -> bool {
        self.text_matches_title(&page.visible_text, titles)
    }

    /// Both checks combined, the acceptance test for a candidate page.
    pub fn accepts<S: AsRef<str>>(&self, page: &PageContent, titles: &[S]) -> bool {
        self.is_job_page_content(page) && self.matches_job_title_content(page, titles)
    }

    fn text_has_keyword(&self, text: &str) -> bool {
        self.job_page_keywords.iter().any(|kw| text.contains(kw.as_str()))
    }

    fn text_matches_title<S: AsRef<str>>(&self, text: &str, titles: &[S]) -> bool {
        if !has_filter(titles) {
            return true;
        }

        let words = tokenize(text);
        titles.iter().any(|title| {
            let lowered = title.as_ref().to_lowercase();
            let title_tokens = tokenize(&lowered);
            !title_tokens.is_empty() && self.has_title_with_context(&words, &title_tokens)
        })
    }

    fn has_title_with_context(&self, words: &[&str], title: &[&str]) -> bool {
        find_phrase(words, title).into_iter().any(|start| {
            let end = start + title.len();
            let window_start = start.saturating_sub(self.context_window);
            let window_end = (end + self.context_window).min(words.len());

            // The title's own tokens are part of the window
            let window = &words[window_start..window_end];
            self.context_phrases
                .iter()
                .any(|phrase| !find_phrase(window, phrase).is_empty())
        })
    }
}

fn has_filter<S: AsRef<str>>(titles: &[S]) -> bool {
    titles.iter().any(|t| !t.as_ref().trim().is_empty())
}

/// Split lower-case text into words made of `a..=z`.
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split(|c: char| !c.is_ascii_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Start offsets where `phrase` occurs as consecutive tokens of `words`.
fn find_phrase<W: AsRef<str>, P: AsRef<str>>(words: &[W], phrase: &[P]) -> Vec<usize> {
    if phrase.is_empty() || phrase.len() > words.len() {
        return Vec::new();
    }

    words
        .windows(phrase.len())
        .enumerate()
        .filter(|(_, window)| {
            window
                .iter()
                .zip(phrase)
                .all(|(w, p)| w.as_ref() == p.as_ref())
        })
        .map(|(i, _)| i)
        .collect()
}

/// [`JobPageClassifier::is_job_page`] with the default vocabulary.
pub fn is_job_page(url: &str, body: &str) -> bool {
    JobPageClassifier::default().is_job_page(url, body)
}

/// [`JobPageClassifier::matches_job_title`] with the default vocabulary.
pub fn matches_job_title<S: AsRef<str>>(body: &str, titles: &[S]) -> bool {
    JobPageClassifier::default().matches_job_title(body, titles)
}
