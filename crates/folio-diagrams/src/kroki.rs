//! Kroki-backed diagram engine.
//!
//! Renders Mermaid diagrams by POSTing the source to a Kroki server
//! (`{kroki_url}/mermaid/svg`). The blocking HTTP call runs on tokio's
//! blocking pool so the render future never stalls the runtime.

use std::sync::{LazyLock, PoisonError, RwLock};
use std::time::Duration;

use regex::{NoExpand, Regex};
use ureq::Agent;

use crate::consts::{DEFAULT_TIMEOUT, MERMAID_ENDPOINT};
use crate::{AnchorId, DiagramConfig, DiagramEngine, DiagramError, DiagramTheme, RenderedDiagram};

/// Opening `<svg ...>` tag.
static SVG_OPEN_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<svg\b[^>]*>").unwrap());

/// `id` attribute value inside a tag.
static ID_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"\sid="([^"]*)""#).unwrap());

/// Create HTTP agent with the specified timeout.
///
/// HTTP error statuses are returned as responses so their body can be
/// reported.
fn create_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

/// Diagram engine talking to a Kroki server.
pub struct KrokiEngine {
    kroki_url: String,
    agent: Agent,
    theme: RwLock<DiagramTheme>,
}

impl KrokiEngine {
    /// Create an engine for the Kroki server at `kroki_url` with the default timeout.
    #[must_use]
    pub fn new(kroki_url: impl Into<String>) -> Self {
        Self::with_timeout(kroki_url, DEFAULT_TIMEOUT)
    }

    /// Create an engine with a custom HTTP timeout.
    #[must_use]
    pub fn with_timeout(kroki_url: impl Into<String>, timeout: Duration) -> Self {
        let kroki_url: String = kroki_url.into();
        Self {
            kroki_url: kroki_url.trim_end_matches('/').to_owned(),
            agent: create_agent(timeout),
            theme: RwLock::new(DiagramTheme::default()),
        }
    }

    /// Kroki server URL without trailing slash.
    #[must_use]
    pub fn kroki_url(&self) -> &str {
        &self.kroki_url
    }

    fn theme(&self) -> DiagramTheme {
        *self.theme.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DiagramEngine for KrokiEngine {
    fn initialize(&self, config: &DiagramConfig) -> Result<(), DiagramError> {
        *self.theme.write().unwrap_or_else(PoisonError::into_inner) = config.theme;
        Ok(())
    }

    async fn render(&self, id: &AnchorId, source: &str) -> Result<RenderedDiagram, DiagramError> {
        let agent = self.agent.clone();
        let url = format!("{}/{MERMAID_ENDPOINT}/svg", self.kroki_url);
        let theme = self.theme();
        let source = source.to_owned();

        tracing::debug!(%id, url = %url, "rendering diagram via Kroki");
        let data = tokio::task::spawn_blocking(move || {
            send_diagram_request(&agent, &url, theme, &source)
        })
        .await??;

        let svg = String::from_utf8(data)
            .map_err(|e| DiagramError::InvalidSvg(format!("invalid UTF-8 in SVG: {e}")))?;
        Ok(RenderedDiagram {
            svg: set_svg_id(svg.trim(), id)?,
        })
    }
}

/// Send a diagram to Kroki and return the response body as bytes.
///
/// Handles HTTP errors by reading the response body for error details.
fn send_diagram_request(
    agent: &Agent,
    url: &str,
    theme: DiagramTheme,
    source: &str,
) -> Result<Vec<u8>, DiagramError> {
    let response = agent
        .post(url)
        .header("Content-Type", "text/plain")
        .header("Kroki-Diagram-Options-theme", theme.as_str())
        .send(source.as_bytes())
        .map_err(|e| DiagramError::Http(e.to_string()))?;

    let status = response.status().as_u16();
    let mut body = response.into_body();

    if status >= 400 {
        let error_body = body
            .read_to_string()
            .unwrap_or_else(|_| String::from("(unable to read error body)"));
        return Err(DiagramError::Http(format!("HTTP {status}: {error_body}")));
    }

    body.read_to_vec()
        .map_err(|e| DiagramError::Io(e.to_string()))
}

/// Point the root SVG element's id at `id`.
///
/// Mermaid scopes its embedded stylesheet by the root id, so `#old` selector
/// references are rewritten along with the attribute. Other text that merely
/// contains the old id is left alone.
fn set_svg_id(svg: &str, id: &AnchorId) -> Result<String, DiagramError> {
    let open = SVG_OPEN_TAG_RE
        .find(svg)
        .ok_or_else(|| DiagramError::InvalidSvg("missing <svg> element".to_owned()))?;

    let old_id = ID_ATTR_RE
        .captures(open.as_str())
        .map(|caps| caps[1].to_owned())
        .filter(|old| !old.is_empty());

    let Some(old) = old_id else {
        return Ok(format!(
            r#"{}<svg id="{id}"{}"#,
            &svg[..open.start()],
            &svg[open.start() + "<svg".len()..]
        ));
    };

    // `#old` not followed by a character that would continue the name
    let selector = Regex::new(&format!(r"#{}([^\w-]|$)", regex::escape(&old)))
        .map_err(|e| DiagramError::InvalidSvg(format!("unusable svg id {old:?}: {e}")))?;
    let tag = ID_ATTR_RE.replace(open.as_str(), NoExpand(&format!(r#" id="{id}""#)));
    let body = selector.replace_all(&svg[open.end()..], format!("#{id}${{1}}").as_str());

    Ok(format!("{}{tag}{body}", &svg[..open.start()]))
}

#[cfg(test)]
mod tests {
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::DIAGRAM_CONFIG;

    /// Serve one HTTP request, reporting the raw request back.
    fn serve_once(status: &'static str, body: &'static str) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let mut request = String::new();
            let mut content_length = 0;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if let Some((name, value)) = line.split_once(':')
                    && name.eq_ignore_ascii_case("content-length")
                {
                    content_length = value.trim().parse().unwrap();
                }
                request.push_str(&line);
                if line == "\r\n" {
                    break;
                }
            }
            let mut payload = vec![0; content_length];
            reader.read_exact(&mut payload).unwrap();
            request.push_str(&String::from_utf8(payload).unwrap());

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: image/svg+xml\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let mut stream = reader.into_inner();
            stream.write_all(response.as_bytes()).unwrap();
            tx.send(request).unwrap();
        });

        (url, rx)
    }

    #[test]
    fn test_set_svg_id_rewrites_scoped_id() {
        let id = AnchorId::next();
        let svg = r#"<svg id="mermaid-svg" width="10"><style>#mermaid-svg .node{}</style></svg>"#;
        let out = set_svg_id(svg, &id).unwrap();
        assert_eq!(
            out,
            format!(r#"<svg id="{id}" width="10"><style>#{id} .node{{}}</style></svg>"#)
        );
    }

    #[test]
    fn test_set_svg_id_leaves_text_containing_old_id() {
        let id = AnchorId::next();
        let svg = concat!(
            r#"<svg id="container"><style>#container .node{} #container-edge{}</style>"#,
            r#"<g id="container-edge"></g><text>docker container #containers</text></svg>"#,
        );
        assert_eq!(
            set_svg_id(svg, &id).unwrap(),
            format!(
                concat!(
                    r#"<svg id="{id}"><style>#{id} .node{{}} #container-edge{{}}</style>"#,
                    r#"<g id="container-edge"></g><text>docker container #containers</text></svg>"#,
                ),
                id = id
            )
        );
    }

    #[test]
    fn test_set_svg_id_selector_at_end_of_input() {
        let id = AnchorId::next();
        let svg = r##"<svg id="m"><a href="#m"/></svg>#m"##;
        assert_eq!(
            set_svg_id(svg, &id).unwrap(),
            format!(r##"<svg id="{id}"><a href="#{id}"/></svg>#{id}"##)
        );
    }

    #[test]
    fn test_set_svg_id_inserts_missing_id() {
        let id = AnchorId::next();
        let svg = r#"<?xml version="1.0"?><svg width="10"></svg>"#;
        assert_eq!(
            set_svg_id(svg, &id).unwrap(),
            format!(r#"<?xml version="1.0"?><svg id="{id}" width="10"></svg>"#)
        );
    }

    #[test]
    fn test_set_svg_id_rejects_non_svg() {
        let id = AnchorId::next();
        assert!(matches!(
            set_svg_id("<html></html>", &id),
            Err(DiagramError::InvalidSvg(_))
        ));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let engine = KrokiEngine::new("https://kroki.io/");
        assert_eq!(engine.kroki_url(), "https://kroki.io");
    }

    #[tokio::test]
    async fn test_render_posts_source_with_theme() {
        let (url, rx) = serve_once("200 OK", r#"<svg id="m"><g/></svg>"#);
        let engine = KrokiEngine::new(url);
        engine.initialize(&DIAGRAM_CONFIG).unwrap();

        let id = AnchorId::next();
        let rendered = engine.render(&id, "graph TD; A-->B;").await.unwrap();
        assert_eq!(rendered.svg, format!(r#"<svg id="{id}"><g/></svg>"#));

        let request = rx.recv().unwrap();
        assert!(request.starts_with("POST /mermaid/svg "));
        assert!(
            request
                .to_ascii_lowercase()
                .contains("kroki-diagram-options-theme: dark")
        );
        assert!(request.ends_with("graph TD; A-->B;"));
    }

    #[tokio::test]
    async fn test_render_reports_http_error_body() {
        let (url, _rx) = serve_once("400 Bad Request", "Syntax error in graph");
        let engine = KrokiEngine::new(url);

        let err = engine
            .render(&AnchorId::next(), "graph TD; A-->")
            .await
            .unwrap_err();
        assert_eq!(
            err,
            DiagramError::Http("HTTP 400: Syntax error in graph".to_owned())
        );
    }
}
