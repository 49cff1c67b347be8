//! mermaid-cli diagram engine.
//!
//! Writes the diagram source into a scratch directory and runs
//! `npx -p @mermaid-js/mermaid-cli mmdc -i <in> -o <out>` on it.

use std::ffi::OsString;
use std::path::Path;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use tokio::process::Command;

use crate::consts::DEFAULT_TIMEOUT;
use crate::{AnchorId, DiagramConfig, DiagramEngine, DiagramError, DiagramTheme, RenderedDiagram};

const INPUT_FILE: &str = "diagram.mmd";
const OUTPUT_FILE: &str = "diagram.svg";

/// Diagram engine spawning the mermaid-cli.
pub struct MermaidCliEngine {
    program: OsString,
    prefix_args: Vec<OsString>,
    timeout: Duration,
    theme: RwLock<DiagramTheme>,
}

impl MermaidCliEngine {
    /// Engine running mermaid-cli through `npx`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_command("npx", ["-p", "@mermaid-js/mermaid-cli", "mmdc"])
    }

    /// Engine running `program` with `prefix_args` before the mmdc arguments.
    #[must_use]
    pub fn with_command<I, S>(program: impl Into<OsString>, prefix_args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            program: program.into(),
            prefix_args: prefix_args.into_iter().map(Into::into).collect(),
            timeout: DEFAULT_TIMEOUT,
            theme: RwLock::new(DiagramTheme::default()),
        }
    }

    /// Set the time allowed for one render.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn args(&self, dir: &Path, id: &AnchorId, theme: DiagramTheme) -> Vec<OsString> {
        let mut args = self.prefix_args.clone();
        args.extend([
            "-i".into(),
            dir.join(INPUT_FILE).into_os_string(),
            "-o".into(),
            dir.join(OUTPUT_FILE).into_os_string(),
            "-t".into(),
            theme.as_str().into(),
            "-I".into(),
            id.as_str().into(),
            "-q".into(),
        ]);
        args
    }
}

impl Default for MermaidCliEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagramEngine for MermaidCliEngine {
    fn initialize(&self, config: &DiagramConfig) -> Result<(), DiagramError> {
        *self.theme.write().unwrap_or_else(PoisonError::into_inner) = config.theme;
        Ok(())
    }

    async fn render(&self, id: &AnchorId, source: &str) -> Result<RenderedDiagram, DiagramError> {
        let theme = *self.theme.read().unwrap_or_else(PoisonError::into_inner);
        let dir = tempfile::tempdir()?;
        tokio::fs::write(dir.path().join(INPUT_FILE), source).await?;

        tracing::debug!(%id, program = ?self.program, "rendering diagram via mermaid-cli");
        let output = Command::new(&self.program)
            .args(self.args(dir.path(), id, theme))
            .kill_on_drop(true)
            .output();
        let output = tokio::time::timeout(self.timeout, output)
            .await
            .map_err(|_| {
                DiagramError::Engine(format!("timed out after {}s", self.timeout.as_secs()))
            })??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DiagramError::Engine(format!(
                "{}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let svg = tokio::fs::read_to_string(dir.path().join(OUTPUT_FILE)).await?;
        if !svg.contains("<svg") {
            return Err(DiagramError::InvalidSvg("missing <svg> element".to_owned()));
        }
        Ok(RenderedDiagram {
            svg: svg.trim().to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::DIAGRAM_CONFIG;

    /// Shell stand-in for mmdc: writes an SVG carrying the `-I` id and echoes
    /// the input back as its text.
    const FAKE_MMDC: &str = r#"
while [ $# -gt 0 ]; do
  case "$1" in
    -i) in="$2"; shift ;;
    -o) out="$2"; shift ;;
    -t) theme="$2"; shift ;;
    -I) id="$2"; shift ;;
  esac
  shift
done
printf '<svg id="%s" data-theme="%s">%s</svg>\n' "$id" "$theme" "$(cat "$in")" > "$out"
"#;

    #[test]
    fn test_default_command_uses_npx() {
        let engine = MermaidCliEngine::new();
        let id = AnchorId::next();
        let args = engine.args(Path::new("/tmp/x"), &id, DiagramTheme::Dark);

        assert_eq!(engine.program, OsString::from("npx"));
        let args: Vec<_> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(
            args,
            [
                "-p",
                "@mermaid-js/mermaid-cli",
                "mmdc",
                "-i",
                "/tmp/x/diagram.mmd",
                "-o",
                "/tmp/x/diagram.svg",
                "-t",
                "dark",
                "-I",
                id.as_str(),
                "-q",
            ]
        );
    }

    #[tokio::test]
    async fn test_render_reads_output_file() {
        let engine = MermaidCliEngine::with_command("sh", ["-c", FAKE_MMDC, "mmdc"]);
        engine.initialize(&DIAGRAM_CONFIG).unwrap();

        let id = AnchorId::next();
        let rendered = engine.render(&id, "graph TD; A-->B;").await.unwrap();
        assert_eq!(
            rendered.svg,
            format!(r#"<svg id="{id}" data-theme="dark">graph TD; A-->B;</svg>"#)
        );
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_engine_error() {
        let engine =
            MermaidCliEngine::with_command("sh", ["-c", "echo 'Parse error on line 1' >&2; exit 1"]);

        let err = engine.render(&AnchorId::next(), "graph").await.unwrap_err();
        let DiagramError::Engine(message) = err else {
            panic!("expected engine error, got {err:?}");
        };
        assert!(message.contains("Parse error on line 1"));
    }

    #[tokio::test]
    async fn test_missing_program_is_io_error() {
        let engine = MermaidCliEngine::with_command("folio-no-such-mmdc", Vec::<String>::new());
        let err = engine.render(&AnchorId::next(), "graph").await.unwrap_err();
        assert!(matches!(err, DiagramError::Io(_)));
    }

    #[tokio::test]
    async fn test_timeout() {
        let engine = MermaidCliEngine::with_command("sh", ["-c", "sleep 5"])
            .with_timeout(Duration::from_millis(50));
        let err = engine.render(&AnchorId::next(), "graph").await.unwrap_err();
        assert!(matches!(err, DiagramError::Engine(m) if m.starts_with("timed out")));
    }
}
