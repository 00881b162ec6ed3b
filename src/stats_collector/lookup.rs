use crate::graph::{GraphCollectors, KeywordGraph, SocialGraph};
use crate::slack::{ResponseSender, SlackResponse};
use crate::stats_collector::request::{LookupRequest, StatsKind};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Body of the task spawned for every accepted stats request
pub(crate) async fn run_lookup(
    request: LookupRequest,
    graph: GraphCollectors,
    responder: Arc<dyn ResponseSender>,
    trace: bool,
) {
    match request.kind {
        StatsKind::User => {
            lookup_user(&request, graph.social.as_ref(), responder.as_ref(), trace).await
        }
        StatsKind::Channel => {
            lookup_channel(&request, graph.social.as_ref(), responder.as_ref(), trace).await
        }
        StatsKind::Keyword => {
            lookup_keyword(&request, graph.keywords.as_ref(), responder.as_ref(), trace).await
        }
    }
}

async fn lookup_user(
    request: &LookupRequest,
    social: &dyn SocialGraph,
    responder: &dyn ResponseSender,
    trace: bool,
) {
    let user = match social.fetch_user_info(&request.name).await {
        Ok(user) => user,
        Err(e) => {
            error!("User lookup returned error: {}", e);
            notify_not_found(request, responder).await;
            return;
        }
    };

    if trace {
        debug!("Found user {}. Collecting information from graph.", request.name);
    }

    // Results are posted to the response URL by the collector
    if let Err(e) = social.fetch_user_stats(user, &request.response_url).await {
        warn!("Statistics fetch for user {} failed: {}", request.name, e);
    }
}

async fn lookup_channel(
    request: &LookupRequest,
    social: &dyn SocialGraph,
    responder: &dyn ResponseSender,
    trace: bool,
) {
    let channel = match social.fetch_channel_info(&request.name).await {
        Ok(channel) => channel,
        Err(e) => {
            error!("Channel lookup returned error: {}", e);
            notify_not_found(request, responder).await;
            return;
        }
    };

    if trace {
        debug!("Found channel {}. Collecting information from graph.", request.name);
    }

    if let Err(e) = social
        .fetch_channel_stats(channel, &request.response_url)
        .await
    {
        warn!("Statistics fetch for channel {} failed: {}", request.name, e);
    }
}

async fn lookup_keyword(
    request: &LookupRequest,
    keywords: &dyn KeywordGraph,
    responder: &dyn ResponseSender,
    trace: bool,
) {
    // An empty match list is not an error; the collector reports zero matches itself
    let matches = match keywords.fetch_keyword_info(&request.name).await {
        Ok(matches) => matches,
        Err(e) => {
            error!("Keyword lookup returned error: {}", e);
            notify_not_found(request, responder).await;
            return;
        }
    };

    if trace {
        debug!(
            "Found {} matches for keyword {}. Collecting information from graph.",
            matches.len(),
            request.name
        );
    }

    if let Err(e) = keywords
        .fetch_keyword_stats(&request.name, matches, &request.response_url)
        .await
    {
        warn!("Statistics fetch for keyword {} failed: {}", request.name, e);
    }
}

/// Tell the requesting user nothing was found; delivery failures are only logged
async fn notify_not_found(request: &LookupRequest, responder: &dyn ResponseSender) {
    let response = SlackResponse::not_found(request.kind);
    if let Err(e) = responder
        .send_response(&response, &request.response_url)
        .await
    {
        warn!(
            "Could not deliver not-found notice for {} {}: {}",
            request.kind, request.name, e
        );
    }
}
