use std::fmt::Write as _;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use crate::clock::{Clock, format_day_month_tr, format_long_tr};
use crate::encyclopedia::{Encyclopedia, Lookup};
use crate::source::AnswerSource;
use crate::tables::{
    CULTURE, CULTURE_KEYWORDS, DAY_KEYWORDS, GEOGRAPHY, GEOGRAPHY_KEYWORDS, GREETING_KEYWORDS, HISTORICAL_EVENTS,
    HISTORY_KEYWORDS, IDENTITY_KEYWORDS, IMPORTANT_DAYS, SMALL_TALK_KEYWORDS, TIME_KEYWORDS, TODAY_KEYWORDS,
    WEATHER, WEATHER_KEYWORDS,
};
use crate::text::{contains_any, find_country, fold, significant_terms, strip_stop_words};

pub const GREETING_TEXT: &str = "Merhaba! Size nasıl yardımcı olabilirim?";
pub const IDENTITY_TEXT: &str = "Ben Keşif Küresi yapay zekasıyım. Dünya hakkında size bilgi vermek için buradayım. Tarih, coğrafya, kültür ve güncel bilgiler hakkında sorular sorabilirsiniz.";
pub const SMALL_TALK_TEXT: &str =
    "Teşekkür ederim, ben bir yapay zeka olduğum için duygularım yok ama size yardımcı olmak için hazırım!";
pub const NO_INFO_TEXT: &str = "Bu konu hakkında detaylı bilgim yok. Lütfen daha açık bir soru sorunuz veya haritada bir ülkeye tıklayınız. Tarih, coğrafya, kültür veya güncel olaylar hakkında sorular sorabilirsiniz.";
pub const LOOKUP_FAILED_TEXT: &str = "Wikipedia'dan bilgi alınırken bir hata oluştu.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Greeting,
    TimeDate,
    Weather,
    History,
    ImportantDay,
    Geography,
    Culture,
    Country,
    Fallback,
}

/// What a rule decided for a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Answer(String),
    /// Search the encyclopedia for this term.
    Lookup(String),
    /// Not this rule's question; try the next one.
    Pass,
}

/// A question prepared once for every rule.
#[derive(Debug, Clone)]
pub struct Query {
    pub raw: String,
    pub folded: String,
}

impl Query {
    pub fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            folded: fold(raw),
        }
    }

    fn mentions(&self, keywords: &[&str]) -> bool {
        contains_any(&self.folded, keywords)
    }

    /// Record match: the question names the record, the record text contains the
    /// whole question, or it contains one of the question's significant terms.
    fn matches_record(&self, key: Option<&str>, fields: &[&str], keywords: &[&str]) -> bool {
        if key.is_some_and(|k| self.folded.contains(k)) {
            return true;
        }
        let folded_fields: Vec<String> = fields.iter().map(|f| fold(f)).collect();
        let question = self.folded.trim();
        if !question.is_empty() && folded_fields.iter().any(|f| f.contains(question)) {
            return true;
        }
        let terms = significant_terms(&self.folded, keywords);
        terms
            .iter()
            .any(|t| folded_fields.iter().any(|f| f.contains(t.as_str())))
    }
}

pub type RuleFn = fn(&Query, &dyn Clock) -> Outcome;

#[derive(Clone, Copy)]
pub struct Rule {
    pub category: Category,
    pub handle: RuleFn,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("category", &self.category).finish()
    }
}

/// The dispatch chain, most specific first.
pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule { category: Category::Greeting, handle: greeting },
        Rule { category: Category::TimeDate, handle: time_date },
        Rule { category: Category::Weather, handle: weather },
        Rule { category: Category::History, handle: history },
        Rule { category: Category::ImportantDay, handle: important_day },
        Rule { category: Category::Geography, handle: geography },
        Rule { category: Category::Culture, handle: culture },
        Rule { category: Category::Country, handle: country },
        Rule { category: Category::Fallback, handle: fallback },
    ]
}

fn greeting(q: &Query, _: &dyn Clock) -> Outcome {
    if q.mentions(GREETING_KEYWORDS) {
        Outcome::Answer(GREETING_TEXT.to_string())
    } else if q.mentions(IDENTITY_KEYWORDS) {
        Outcome::Answer(IDENTITY_TEXT.to_string())
    } else if q.mentions(SMALL_TALK_KEYWORDS) {
        Outcome::Answer(SMALL_TALK_TEXT.to_string())
    } else {
        Outcome::Pass
    }
}

fn time_date(q: &Query, clock: &dyn Clock) -> Outcome {
    if !q.mentions(TIME_KEYWORDS) {
        return Outcome::Pass;
    }
    Outcome::Answer(format!("Şu an: {}", format_long_tr(clock.now())))
}

fn weather(q: &Query, _: &dyn Clock) -> Outcome {
    if !q.mentions(WEATHER_KEYWORDS) {
        return Outcome::Pass;
    }
    match WEATHER.iter().find(|c| q.folded.contains(c.key)) {
        Some(city) => Outcome::Answer(weather_report(city.key)),
        None => Outcome::Pass,
    }
}

/// Canned report for a city from the static table.
pub fn weather_report(city: &str) -> String {
    let key = fold(city);
    match WEATHER.iter().find(|c| c.key == key) {
        Some(c) => format!("{} için hava durumu: {}°C ve {}.", c.display, c.temp_c, c.condition),
        None => format!("{city} için hava durumu bilgisi bulunamadı."),
    }
}

fn history(q: &Query, _: &dyn Clock) -> Outcome {
    if !q.mentions(HISTORY_KEYWORDS) {
        return Outcome::Pass;
    }
    let matches: Vec<_> = HISTORICAL_EVENTS
        .iter()
        .filter(|e| q.matches_record(None, &[e.date, e.event], HISTORY_KEYWORDS))
        .collect();
    if matches.is_empty() {
        return Outcome::Pass;
    }

    let mut out = String::from("Tarihte bu konuyla ilgili önemli olaylar:\n\n");
    for e in matches {
        let _ = write!(out, "📅 {}: {}\n{}\n\n", e.date, e.event, e.importance);
    }
    Outcome::Answer(out)
}

fn important_day(q: &Query, clock: &dyn Clock) -> Outcome {
    if !q.mentions(DAY_KEYWORDS) {
        return Outcome::Pass;
    }

    if q.mentions(TODAY_KEYWORDS) {
        let today = format_day_month_tr(clock.now());
        let todays: Vec<_> = IMPORTANT_DAYS.iter().filter(|d| d.date == today).collect();
        if todays.is_empty() {
            return Outcome::Answer(format!("Bugün ({today}) için kayıtlı özel bir gün bulunmuyor."));
        }
        let mut out = format!("Bugün ({today}) önemli bir gün:\n\n");
        for d in todays {
            let _ = writeln!(out, "🎉 {}: {}", d.name, d.description);
        }
        return Outcome::Answer(out);
    }

    let matches: Vec<_> = IMPORTANT_DAYS
        .iter()
        .filter(|d| q.matches_record(None, &[d.date, d.name], DAY_KEYWORDS))
        .collect();
    if matches.is_empty() {
        return Outcome::Pass;
    }
    let mut out = String::from("Bu tarihle ilgili önemli günler:\n\n");
    for d in matches {
        let _ = writeln!(out, "📅 {} - {}: {}", d.date, d.name, d.description);
    }
    Outcome::Answer(out)
}

fn geography(q: &Query, _: &dyn Clock) -> Outcome {
    if !q.mentions(GEOGRAPHY_KEYWORDS) {
        return Outcome::Pass;
    }
    let Some(entry) = GEOGRAPHY
        .iter()
        .find(|g| q.matches_record(Some(g.key), &[g.name], GEOGRAPHY_KEYWORDS))
    else {
        return Outcome::Pass;
    };

    let mut out = format!("🌍 {} ({})\n\n", entry.name, entry.continent);
    if let Some(capital) = entry.capital {
        let _ = writeln!(out, "Başkent: {capital}");
    }
    if let Some(population) = entry.population {
        let _ = writeln!(out, "Nüfus: {population}");
    }
    if let Some(area) = entry.area {
        let _ = write!(out, "Yüzölçümü: {area}\n\n");
    }
    out.push_str("Coğrafi Bilgiler:\n");
    for (i, fact) in entry.facts.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, fact);
    }
    Outcome::Answer(out)
}

fn culture(q: &Query, _: &dyn Clock) -> Outcome {
    if !q.mentions(CULTURE_KEYWORDS) {
        return Outcome::Pass;
    }
    let Some(alias) = find_country(&q.folded) else {
        return Outcome::Pass;
    };
    let key = fold(alias.canonical);
    let Some(info) = CULTURE.iter().find(|c| c.key == key) else {
        return Outcome::Pass;
    };

    Outcome::Answer(format!(
        "{} Kültürel Bilgiler:\n\n🗣️ Dil: {}\n🍲 Mutfak: {}\n🎭 Gelenekler: {}\n🏛️ Önemli Yerler: {}\n",
        info.country, info.language, info.cuisine, info.traditions, info.landmarks
    ))
}

fn country(q: &Query, _: &dyn Clock) -> Outcome {
    match find_country(&q.folded) {
        Some(alias) => Outcome::Lookup(alias.canonical.to_string()),
        None => Outcome::Pass,
    }
}

fn fallback(q: &Query, _: &dyn Clock) -> Outcome {
    let cleaned = strip_stop_words(&q.folded);
    if cleaned.chars().count() > 2 {
        Outcome::Lookup(cleaned)
    } else {
        Outcome::Answer(NO_INFO_TEXT.to_string())
    }
}

/// Keyword-chain question answering over static tables with an encyclopedia fallback.
pub struct KnowledgeRouter {
    rules: Vec<Rule>,
    encyclopedia: Arc<dyn Encyclopedia>,
    clock: Arc<dyn Clock>,
}

impl KnowledgeRouter {
    pub fn new(encyclopedia: Arc<dyn Encyclopedia>, clock: Arc<dyn Clock>) -> Self {
        Self {
            rules: default_rules(),
            encyclopedia,
            clock,
        }
    }

    pub fn with_rules(mut self, rules: Vec<Rule>) -> Self {
        self.rules = rules;
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// First rule with an opinion on the question. `None` only for an empty rule list.
    pub fn classify(&self, question: &str) -> Option<(Category, Outcome)> {
        let query = Query::new(question);
        self.rules.iter().find_map(|rule| match (rule.handle)(&query, self.clock.as_ref()) {
            Outcome::Pass => None,
            outcome => Some((rule.category, outcome)),
        })
    }

    /// Encyclopedia lookup with failures turned into apology text.
    pub async fn lookup(&self, term: &str) -> String {
        match self.encyclopedia.lookup(term).await {
            Ok(Lookup::Found(text)) => text,
            Ok(Lookup::NotFound) => format!("Wikipedia'da \"{term}\" ile ilgili bilgi bulunamadı."),
            Err(err) => {
                warn!(%term, error = %err, "encyclopedia lookup failed");
                LOOKUP_FAILED_TEXT.to_string()
            }
        }
    }
}

#[async_trait]
impl AnswerSource for KnowledgeRouter {
    async fn answer(&self, question: &str) -> String {
        match self.classify(question) {
            Some((category, Outcome::Answer(text))) => {
                debug!(?category, "answered from tables");
                text
            }
            Some((category, Outcome::Lookup(term))) => {
                debug!(?category, %term, "answering from encyclopedia");
                self.lookup(&term).await
            }
            Some((_, Outcome::Pass)) | None => NO_INFO_TEXT.to_string(),
        }
    }
}
