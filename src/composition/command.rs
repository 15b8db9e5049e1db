//! The fully planned engine invocation.

use std::path::{Path, PathBuf};

use crate::composition::graph::FilterGraph;
use crate::error::Result;

/// Concat demuxer list naming every clip by absolute path
#[derive(Debug, Clone, PartialEq)]
pub struct ConcatList {
    path: PathBuf,
    contents: String,
}

impl ConcatList {
    /// Build the list for `clips`, one `file '<absolute path>'` line per clip
    pub fn for_clips<P: Into<PathBuf>>(path: P, clips: &[PathBuf]) -> Result<Self> {
        let mut lines = Vec::with_capacity(clips.len());
        for clip in clips {
            let absolute = std::path::absolute(clip)?;
            lines.push(format!("file '{}'", absolute.display()));
        }

        Ok(Self {
            path: path.into(),
            contents: lines.join("\n"),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    pub async fn write(&self) -> Result<()> {
        tokio::fs::write(&self.path, &self.contents).await?;
        Ok(())
    }

    pub async fn remove(&self) -> Result<()> {
        tokio::fs::remove_file(&self.path).await?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Source {
    Concat(ConcatList),
    Filtered { graph: FilterGraph, final_label: String },
}

/// Engine invocation built in one piece by the graph builder
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    program: String,
    clips: Vec<PathBuf>,
    source: Source,
    output: PathBuf,
    encoding: Vec<(String, String)>,
}

impl Command {
    /// Concatenate through the demuxer with stream copy
    pub(crate) fn concat(program: &str, clips: &[PathBuf], list: ConcatList, output: &Path) -> Self {
        Self {
            program: program.to_string(),
            clips: clips.to_vec(),
            source: Source::Concat(list),
            output: output.to_path_buf(),
            encoding: vec![("-c".to_string(), "copy".to_string())],
        }
    }

    /// Run `graph` over the clips and encode the stream labelled `final_label`
    ///
    /// Fails if the graph has a dangling or duplicate label.
    pub(crate) fn filtered(
        program: &str,
        clips: &[PathBuf],
        graph: FilterGraph,
        final_label: &str,
        output: &Path,
        encoding: Vec<(String, String)>,
    ) -> Result<Self> {
        graph.validate(clips.len(), final_label)?;
        Ok(Self {
            program: program.to_string(),
            clips: clips.to_vec(),
            source: Source::Filtered {
                graph,
                final_label: final_label.to_string(),
            },
            output: output.to_path_buf(),
            encoding,
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Clip paths in input order
    pub fn clips(&self) -> &[PathBuf] {
        &self.clips
    }

    pub fn filter_graph(&self) -> Option<&FilterGraph> {
        match &self.source {
            Source::Filtered { graph, .. } => Some(graph),
            Source::Concat(_) => None,
        }
    }

    pub fn final_output_label(&self) -> Option<&str> {
        match &self.source {
            Source::Filtered { final_label, .. } => Some(final_label),
            Source::Concat(_) => None,
        }
    }

    pub fn concat_list(&self) -> Option<&ConcatList> {
        match &self.source {
            Source::Concat(list) => Some(list),
            Source::Filtered { .. } => None,
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output
    }

    pub fn encoding_params(&self) -> &[(String, String)] {
        &self.encoding
    }

    /// Argument vector handed to the engine, without the program name
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::new();

        match &self.source {
            Source::Concat(list) => {
                args.extend(["-f", "concat", "-safe", "0", "-i"].map(String::from));
                args.push(list.path().display().to_string());
            }
            Source::Filtered { graph, final_label } => {
                for clip in &self.clips {
                    args.push("-i".to_string());
                    args.push(clip.display().to_string());
                }
                args.push("-filter_complex".to_string());
                args.push(graph.to_string());
                args.push("-map".to_string());
                args.push(format!("[{}]", final_label));
            }
        }

        for (flag, value) in &self.encoding {
            args.push(flag.clone());
            args.push(value.clone());
        }
        args.push("-y".to_string());
        args.push(self.output.display().to_string());
        args
    }

    /// Shell-style command line shown in preview mode
    pub fn render(&self) -> String {
        let mut parts = vec![self.program.clone()];

        match &self.source {
            Source::Concat(list) => {
                parts.push("-f concat -safe 0 -i".to_string());
                parts.push(quote(&list.path().display().to_string()));
            }
            Source::Filtered { graph, final_label } => {
                for clip in &self.clips {
                    parts.push(format!("-i {}", quote(&clip.display().to_string())));
                }
                parts.push(format!("-filter_complex {}", quote(&graph.to_string())));
                parts.push(format!("-map {}", quote(&format!("[{}]", final_label))));
            }
        }

        for (flag, value) in &self.encoding {
            parts.push(format!("{} {}", flag, value));
        }
        parts.push(format!("-y {}", quote(&self.output.display().to_string())));
        parts.join(" ")
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
