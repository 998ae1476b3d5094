use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Url;

use super::model::{CadResponse, CadTable};
use crate::error::{NeoError, NeoResult};

/// Public JPL SSD close-approach endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://ssd-api.jpl.nasa.gov/cad.api";
/// Two years ahead.
pub const DEFAULT_HORIZON_DAYS: u32 = 365 * 2;

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// The parameters of one `cad.api` request. Also the cache key payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CadQuery {
    /// Look-ahead window in days, sent as `date-max=+N`.
    pub date_max_days: u32,
}

impl Default for CadQuery {
    fn default() -> Self {
        CadQuery {
            date_max_days: DEFAULT_HORIZON_DAYS,
        }
    }
}

impl CadQuery {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![("date-max", format!("+{}", self.date_max_days))]
    }

    /// Full request URL, e.g. `https://ssd-api.jpl.nasa.gov/cad.api?date-max=%2B730`.
    pub fn request_url(&self, endpoint: &str) -> NeoResult<Url> {
        let pairs = self.query_pairs();
        Url::parse_with_params(endpoint, pairs.iter().map(|(k, v)| (*k, v.as_str())))
            .map_err(|_| NeoError::Endpoint(endpoint.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Fetch result
// ---------------------------------------------------------------------------

/// A parsed table plus where it came from (shown as provenance in the UI).
#[derive(Debug, Clone)]
pub struct FetchedTable {
    pub table: CadTable,
    pub source: String,
}

// ---------------------------------------------------------------------------
// HTTP client
// ---------------------------------------------------------------------------

/// One GET per call, no retries. Non-2xx responses are errors.
pub struct CadClient {
    http: reqwest::blocking::Client,
    endpoint: String,
}

impl CadClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("neo-dashboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building HTTP client")?;
        Ok(CadClient {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn fetch(&self, query: &CadQuery) -> NeoResult<FetchedTable> {
        let url = query.request_url(&self.endpoint)?;
        let http_err = |source| NeoError::Http {
            url: url.to_string(),
            source,
        };

        log::info!("GET {url}");
        let response = self
            .http
            .get(url.clone())
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(http_err)?;

        // Report the URL the server actually answered (after redirects).
        let source = response.url().to_string();
        let body = response.text().map_err(http_err)?;
        let table = parse_cad_body(&body)?;
        log::info!("{} close approaches from {source}", table.len());

        Ok(FetchedTable { table, source })
    }
}

// ---------------------------------------------------------------------------
// Body parsing
// ---------------------------------------------------------------------------

/// Parse a `cad.api` JSON body into a [`CadTable`].
pub fn parse_cad_body(body: &str) -> NeoResult<CadTable> {
    let response: CadResponse = serde_json::from_str(body)?;
    if let Some(sig) = &response.signature {
        log::debug!("CAD response signature: {} v{}", sig.source, sig.version);
    }
    let declared = response.declared_count();
    let table = CadTable::from_response(response)?;
    if let Some(count) = declared.filter(|&n| n != table.len()) {
        log::warn!("CAD response declares {count} rows but carries {}", table.len());
    }
    Ok(table)
}

/// Offline mode: read a previously saved `cad.api` response.
pub fn load_cad_file(path: &Path) -> Result<FetchedTable> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let table = parse_cad_body(&text).with_context(|| format!("parsing {}", path.display()))?;
    Ok(FetchedTable {
        table,
        source: path.display().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;

    const BODY: &str = r#"{
        "signature": {"source": "NASA/JPL SBDB Close Approach Data API", "version": "1.5"},
        "count": "2",
        "fields": ["des", "orbit_id", "jd", "cd", "dist", "dist_min", "dist_max", "v_rel", "v_inf", "t_sigma_f", "h"],
        "data": [
            ["2025 AB", "4", "2460676.500000000", "2025-Jan-01 00:00", "0.02", "0.015", "0.025", "8.1", "8.0", "< 00:01", "24.3"],
            ["2025 BC", "2", "2460720.250000000", "2025-Feb-14 18:00", "0.041", "0.0409", "0.0411", "12.5", null, "00:02", null]
        ]
    }"#;

    #[test]
    fn default_request_url() {
        let url = CadQuery::default().request_url(DEFAULT_ENDPOINT).unwrap();
        assert_eq!(
            url.as_str(),
            "https://ssd-api.jpl.nasa.gov/cad.api?date-max=%2B730"
        );
    }

    #[test]
    fn custom_horizon() {
        let q = CadQuery { date_max_days: 60 };
        assert_eq!(q.query_pairs(), vec![("date-max", "+60".to_string())]);
    }

    #[test]
    fn bad_endpoint() {
        let err = CadQuery::default().request_url("not a url").unwrap_err();
        assert!(matches!(err, NeoError::Endpoint(_)));
    }

    #[test]
    fn parses_body() {
        let table = parse_cad_body(BODY).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.fields.len(), 11);
        assert_eq!(table.rows[1][8], None);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(parse_cad_body("{\"fields\": "), Err(NeoError::Json(_))));
        // error payloads from the API carry no field list
        assert!(matches!(
            parse_cad_body(r#"{"error": "invalid parameter"}"#),
            Err(NeoError::Json(_))
        ));
    }

    #[test]
    fn loads_saved_response() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(BODY.as_bytes()).unwrap();

        let fetched = load_cad_file(file.path()).unwrap();
        assert_eq!(fetched.table.len(), 2);
        assert_eq!(fetched.source, file.path().display().to_string());
    }

    #[test]
    fn missing_file() {
        let err = load_cad_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(format!("{err:#}").contains("reading"));
    }

    /// Answer one request on a local port with `status` and `body`.
    /// Returns the endpoint URL and a handle yielding the request line.
    fn serve_once(status: &'static str, body: &'static str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            // drain headers
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                    break;
                }
            }
            let mut stream = reader.into_inner();
            write!(
                stream,
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .unwrap();
            stream.flush().unwrap();
            request_line.trim_end().to_string()
        });
        (format!("http://{addr}/cad.api"), handle)
    }

    #[test]
    fn fetch_returns_table_and_resolved_url() {
        let (endpoint, server) = serve_once("200 OK", BODY);
        let client = CadClient::new(endpoint, Duration::from_secs(5)).unwrap();

        let fetched = client.fetch(&CadQuery::default()).unwrap();
        assert_eq!(fetched.table.len(), 2);
        assert!(fetched.source.ends_with("/cad.api?date-max=%2B730"));
        assert_eq!(server.join().unwrap(), "GET /cad.api?date-max=%2B730 HTTP/1.1");
    }

    #[test]
    fn server_error_is_an_http_error() {
        let (endpoint, server) = serve_once("500 Internal Server Error", r#"{"message": "down"}"#);
        let client = CadClient::new(endpoint, Duration::from_secs(5)).unwrap();

        let err = client.fetch(&CadQuery::default()).unwrap_err();
        assert!(matches!(&err, NeoError::Http { url, .. } if url.ends_with("?date-max=%2B730")));
        server.join().unwrap();
    }

    #[test]
    fn unreachable_endpoint_is_an_http_error() {
        // bind then drop so nothing listens on the port
        let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
        let client = CadClient::new(format!("http://{addr}/cad.api"), Duration::from_secs(5)).unwrap();
        assert!(matches!(
            client.fetch(&CadQuery::default()),
            Err(NeoError::Http { .. })
        ));
    }
}
