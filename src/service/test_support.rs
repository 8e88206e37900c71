//! Scripted collaborator doubles shared by service tests

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::model::CompanyProfile;
use crate::model::extraction::{ExtractedCandidate, ExtractedCandidates, ExtractedKeywords};
use crate::service::llm::{LlmError, TextGenerator};
use crate::service::oracle::{KnowledgeOracle, OracleAnswer, OracleError};
use crate::service::serp::{SerpError, SerpResponse, SerpSearch};

type OracleResponder = Box<dyn Fn(&str) -> Result<OracleAnswer, OracleError> + Send + Sync>;

/// Oracle answering every query through a closure and counting calls
pub struct ScriptedOracle {
    responder: OracleResponder,
    calls: AtomicUsize,
}

impl ScriptedOracle {
    pub fn new(
        responder: impl Fn(&str) -> Result<OracleAnswer, OracleError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            calls: AtomicUsize::new(0),
        }
    }

    /// Same answer for every query
    pub fn answering(answer: &str, citations: &[&str]) -> Self {
        let answer = OracleAnswer {
            answer: answer.to_string(),
            citations: citations.iter().map(|c| c.to_string()).collect(),
        };
        Self::new(move |_| Ok(answer.clone()))
    }

    /// Every query fails
    pub fn failing() -> Self {
        Self::new(|_| Err(OracleError::NotConfigured))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KnowledgeOracle for ScriptedOracle {
    async fn query(&self, _system: &str, query: &str) -> Result<OracleAnswer, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.responder)(query)
    }
}

/// Text generator returning canned structures; `None` means the call fails
#[derive(Default)]
pub struct ScriptedGenerator {
    pub parsed: Option<ExtractedCandidates>,
    pub generated: Option<ExtractedCandidates>,
    pub keywords: Option<ExtractedKeywords>,
}

impl ScriptedGenerator {
    pub fn competitors(entries: &[(&str, &str)]) -> ExtractedCandidates {
        ExtractedCandidates {
            competitors: entries
                .iter()
                .map(|(name, url)| ExtractedCandidate {
                    name: name.to_string(),
                    url: Some(url.to_string()),
                    strengths: None,
                    products: None,
                    score: Some(0),
                })
                .collect(),
        }
    }
}

fn scripted<T: Clone>(value: &Option<T>, operation: &str) -> Result<T, LlmError> {
    value
        .clone()
        .ok_or_else(|| LlmError::ExtractionFailed(format!("scripted {} failure", operation)))
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn parse_candidates(
        &self,
        _niche: &str,
        _answer: &str,
        _citations: &[String],
    ) -> Result<ExtractedCandidates, LlmError> {
        scripted(&self.parsed, "parse")
    }

    async fn generate_candidates(&self, _niche: &str) -> Result<ExtractedCandidates, LlmError> {
        scripted(&self.generated, "generate")
    }

    async fn generate_keywords(
        &self,
        _profile: &CompanyProfile,
    ) -> Result<ExtractedKeywords, LlmError> {
        scripted(&self.keywords, "keywords")
    }
}

/// SERP client answering from a query → response map; unknown queries fail
#[derive(Default)]
pub struct ScriptedSerp {
    responses: HashMap<String, SerpResponse>,
    pub queries: Mutex<Vec<String>>,
}

impl ScriptedSerp {
    pub fn with(mut self, query: &str, response: SerpResponse) -> Self {
        self.responses.insert(query.to_string(), response);
        self
    }

    pub fn seen_queries(&self) -> Vec<String> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl SerpSearch for ScriptedSerp {
    async fn search(&self, query: &str, _location: &str) -> Result<SerpResponse, SerpError> {
        if let Ok(mut seen) = self.queries.lock() {
            seen.push(query.to_string());
        }
        self.responses
            .get(query)
            .cloned()
            .ok_or_else(|| SerpError::Status {
                status: 500,
                body: format!("no scripted response for {}", query),
            })
    }
}
