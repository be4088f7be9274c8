// src/tests/utils.rs
//
// Fake collaborators and a throwaway server state for router and pipeline tests.

use crate::db::{init_db, Database};
use crate::domain::{SubjectProperty, Tier};
use crate::narrative::{NarrativeError, NarrativeGenerator, NarrativePrompt, PromptKind};
use crate::report::{Collaborators, HtmlReportAssembler};
use crate::router::AppState;
use crate::sources::{ComparableQuery, ComparableSearch, PropertyLookup, SourceError, TaxHistory};
use astra::{Body, Request, Response};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::io::Read;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

pub const SUBJECT_ADDRESS: &str = "110 Vandelinda Ave, Teaneck, NJ 07666";

pub fn subject() -> SubjectProperty {
    let mut s = SubjectProperty::new(SUBJECT_ADDRESS);
    s.latitude = Some(40.8884);
    s.longitude = Some(-74.0118);
    s.bedrooms = Some(3);
    s.bathrooms = Some(2.0);
    s.living_area = Some(2000.0);
    s.price = Some(520_000.0);
    s.assessed_value = Some(410_000.0);
    s.days_on_market = Some(14);
    s.listing_url = Some("https://www.zillow.com/homedetails/x/1_zpid/".into());
    s
}

/// A complete search hit: 3 bed, 2 bath, 5000 sq ft lot.
pub fn candidate(i: usize, tier: Tier, price: f64, living: f64) -> Value {
    let status = match tier {
        Tier::Sold => "recentlySold",
        Tier::Active => "forSale",
    };
    json!({
        "property": {
            "zpid": 9000 + i,
            "bedrooms": 3,
            "bathrooms": 2,
            "livingArea": living,
            "yearBuilt": 1955,
            "lotSizeWithUnit": { "lotSize": 5000, "lotSizeUnit": "sqft" },
            "address": {
                "streetAddress": format!("{} Cedar Ln", 20 + i),
                "city": "Teaneck",
                "state": "NJ",
                "zipcode": "07666"
            },
            "location": { "latitude": 40.89, "longitude": -74.01 },
            "media": { "propertyPhotoLinks": { "mediumSizeLink": format!("https://photos.example/{i}.jpg") } },
            "price": { "value": price },
            "listing": { "listingStatus": status },
            "lastSoldDate": 1_717_200_000_000i64,
            "daysOnZillow": 21
        }
    })
}

pub fn candidates(n: usize, tier: Tier, price: f64, living: f64) -> Vec<Value> {
    (0..n).map(|i| candidate(i, tier, price, living)).collect()
}

pub struct FakeLookup {
    pub known: HashMap<String, SubjectProperty>,
}

impl FakeLookup {
    pub fn with(subject: SubjectProperty) -> Self {
        let mut known = HashMap::new();
        known.insert(subject.address.clone(), subject);
        Self { known }
    }
}

impl PropertyLookup for FakeLookup {
    fn lookup(&self, address: &str) -> Result<SubjectProperty, SourceError> {
        self.known
            .get(address)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(address.to_string()))
    }
}

/// Same hits for every attempt of a tier; records each query.
pub struct FakeSearch {
    pub sold: Vec<Value>,
    pub active: Vec<Value>,
    pub queries: Mutex<Vec<ComparableQuery>>,
}

impl FakeSearch {
    pub fn new(sold: Vec<Value>, active: Vec<Value>) -> Self {
        Self {
            sold,
            active,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<ComparableQuery> {
        self.queries.lock().unwrap().clone()
    }
}

impl ComparableSearch for FakeSearch {
    fn search(&self, query: &ComparableQuery) -> Result<Vec<Value>, SourceError> {
        self.queries.lock().unwrap().push(query.clone());
        Ok(match query.tier {
            Tier::Sold => self.sold.clone(),
            Tier::Active => self.active.clone(),
        })
    }
}

pub struct FakeTax(pub Result<Option<f64>, ()>);

impl TaxHistory for FakeTax {
    fn annual_tax(&self, _subject: &SubjectProperty) -> Result<Option<f64>, SourceError> {
        self.0
            .map_err(|_| SourceError::Api {
                status: 429,
                body: "rate limited".into(),
            })
    }
}

/// Answers each prompt kind from a script; `None` means the call fails.
pub struct FakeNarrator {
    pub pricing: Option<String>,
    pub recommendation: Option<String>,
    pub considerations: Option<String>,
}

impl FakeNarrator {
    pub fn silent() -> Self {
        Self {
            pricing: None,
            recommendation: None,
            considerations: None,
        }
    }

    pub fn answering(pricing: &str) -> Self {
        Self {
            pricing: Some(pricing.to_string()),
            recommendation: Some("Recommend listing near the midpoint.".into()),
            considerations: Some("Check the roof and the sewer line.".into()),
        }
    }
}

impl NarrativeGenerator for FakeNarrator {
    fn complete(&self, prompt: &NarrativePrompt) -> Result<String, NarrativeError> {
        let answer = match prompt.kind {
            PromptKind::Pricing => &self.pricing,
            PromptKind::Recommendation => &self.recommendation,
            PromptKind::Considerations => &self.considerations,
        };
        answer
            .clone()
            .ok_or_else(|| NarrativeError::Config("OPENAI_API_KEY not set".into()))
    }
}

pub fn collaborators(
    search: Arc<FakeSearch>,
    tax: FakeTax,
    narrator: FakeNarrator,
) -> Collaborators {
    Collaborators {
        lookup: Arc::new(FakeLookup::with(subject())),
        search,
        tax: Arc::new(tax),
        narrative: Arc::new(narrator),
    }
}

/// App state backed by a fresh SQLite file and reports directory. Both are removed on drop.
pub struct TestEnv {
    pub state: AppState,
    pub root: PathBuf,
}

impl TestEnv {
    pub fn new(collab: Collaborators) -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let root = std::env::temp_dir().join(format!(
            "comp_appraiser_test_{nanos}_{}",
            COUNTER.fetch_add(1, Ordering::SeqCst)
        ));
        std::fs::create_dir_all(&root).unwrap();

        let db = Database::new(root.join("test.sqlite3").to_string_lossy().to_string());
        init_db(&db).expect("Failed to initialize DB");

        let state = AppState {
            db,
            collab,
            assembler: Arc::new(HtmlReportAssembler),
            reports_dir: root.join("reports"),
            base_url: "http://localhost:8000".into(),
            radius_miles: 1.0,
        };

        Self { state, root }
    }
}

impl Drop for TestEnv {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

pub fn request(method: &str, uri: &str, body: impl Into<Body>) -> Request {
    http::Request::builder()
        .method(method)
        .uri(uri)
        .body(body.into())
        .unwrap()
}

pub fn get(uri: &str) -> Request {
    request("GET", uri, Body::empty())
}

pub fn body_string(mut resp: Response) -> String {
    let mut body = String::new();
    resp.body_mut()
        .reader()
        .read_to_string(&mut body)
        .unwrap();
    body
}

pub fn body_json(resp: Response) -> Value {
    serde_json::from_str(&body_string(resp)).unwrap()
}
