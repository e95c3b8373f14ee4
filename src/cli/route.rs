//! `duelbench route`

use crate::settings::AppConfig;
use anyhow::Result;
use clap::Args;
use duelbench_llm::{ProviderCredentials, ProviderRouter};
use serde_json::json;

#[derive(Args, Debug)]
pub struct RouteArgs {
    /// Model identifier
    #[arg(short, long)]
    pub model: String,
    /// Samples to shape the request for
    #[arg(short = 'n', long)]
    pub samples: Option<u32>,
}

pub fn run(args: &RouteArgs, config: &AppConfig) -> Result<()> {
    let request = config.model.request(Some(args.model.as_str()), args.samples);
    let profile = ProviderRouter::profile(&request.model_id);
    let family = profile.family;

    let native = profile.supports_native_sampling() && request.sample_count > 1;
    let shape = if native {
        profile.shape(&request).with_samples(request.sample_count)
    } else {
        profile.shape(&request)
    };

    let decision = json!({
        "model": request.model_id,
        "profile": profile.kind,
        "provider": family,
        "base_url": config.endpoints.base_url(family),
        "credential_env": family.api_key_env(),
        "credential_present": ProviderCredentials::from_env().has(family),
        "sampling": if native { "native" } else { "manual" },
        "calls_per_query": if native { 1 } else { request.sample_count },
        "usage_fields": profile.token_field_candidates,
        "request": shape,
    });

    println!("{}", serde_json::to_string_pretty(&decision)?);
    Ok(())
}
