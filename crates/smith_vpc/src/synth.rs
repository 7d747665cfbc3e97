//! Writing synthesized stacks to disk.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::VpcResult;
use crate::provider::IacProvider;
use crate::stack::Stack;
use crate::template::CloudFormationTemplate;
use crate::terraform::TerraformRenderer;

/// Writes a stack's template files for one provider.
pub struct Synthesizer {
    provider: IacProvider,
    yaml: bool,
}

impl Synthesizer {
    pub fn new(provider: IacProvider) -> Self {
        Self {
            provider,
            yaml: false,
        }
    }

    /// Emit CloudFormation templates as YAML instead of JSON.
    pub fn yaml(mut self, yaml: bool) -> Self {
        self.yaml = yaml;
        self
    }

    /// Write the stack into `out_dir`, returning the files written.
    pub fn write(&self, out_dir: &Path, stack: &Stack) -> VpcResult<Vec<PathBuf>> {
        info!(
            "Writing {} output for stack {} to {:?}",
            self.provider, stack.name, out_dir
        );
        fs::create_dir_all(out_dir)?;

        let files = match self.provider {
            IacProvider::CloudFormation => {
                let (name, content) = if self.yaml {
                    (
                        format!("{}.template.yaml", stack.name),
                        CloudFormationTemplate::to_yaml(stack)?,
                    )
                } else {
                    (
                        format!("{}.template.json", stack.name),
                        CloudFormationTemplate::to_json(stack)?,
                    )
                };
                vec![(name, content)]
            }
            IacProvider::Terraform => TerraformRenderer::new(stack)
                .files()
                .into_iter()
                .map(|(name, content)| (name.to_string(), content))
                .collect(),
        };

        let mut written = Vec::with_capacity(files.len());
        for (name, content) in files {
            let path = out_dir.join(name);
            fs::write(&path, content)?;
            written.push(path);
        }

        info!("Wrote {} files", written.len());
        Ok(written)
    }
}
