mod common;

use std::sync::Arc;

use common::FakeTeamsApi;
use provider::{OrgName, Provider, ProviderError, Resource, ResourceData};

fn build_provider(api: &Arc<FakeTeamsApi>) -> Provider {
    Provider::new(api.clone(), OrgName::new("acme").unwrap())
}

#[test]
fn registers_both_resource_types() {
    let api = Arc::new(FakeTeamsApi::starting_at(1));
    let types: Vec<_> = build_provider(&api).resource_types().collect();
    assert_eq!(types, vec!["github_team", "github_team_membership"]);
}

#[test]
fn unknown_resource_type_is_an_error() {
    let api = Arc::new(FakeTeamsApi::starting_at(1));
    let err = build_provider(&api).resource("github_repository").err().unwrap();
    assert!(matches!(err, ProviderError::UnknownResourceType(ref t) if t == "github_repository"));
}

#[tokio::test]
async fn handlers_share_the_injected_client() {
    let api = Arc::new(FakeTeamsApi::starting_at(10));
    let provider = build_provider(&api);

    let mut team = ResourceData::new().attr("name", "infra");
    provider.resource("github_team").unwrap().create(&mut team).await.unwrap();

    let mut membership = ResourceData::new()
        .attr("team_id", team.id())
        .attr("username", "carol");
    provider
        .resource("github_team_membership")
        .unwrap()
        .create(&mut membership)
        .await
        .unwrap();

    assert_eq!(membership.id(), "10:carol");
    assert!(api.membership(10, "carol").is_some());
}

#[tokio::test]
async fn concurrent_reads_use_their_own_preconditions() {
    let api = Arc::new(FakeTeamsApi::starting_at(1));
    let provider = Arc::new(build_provider(&api));
    let teams = provider.resource("github_team").unwrap();

    let mut a = ResourceData::new().attr("name", "a");
    let mut b = ResourceData::new().attr("name", "b");
    teams.create(&mut a).await.unwrap();
    teams.create(&mut b).await.unwrap();
    api.rename_out_of_band(2, "b2");

    let (ra, rb) = tokio::join!(teams.read(&mut a), teams.read(&mut b));
    ra.unwrap();
    rb.unwrap();

    assert_eq!(a.get("name"), "a");
    assert_eq!(a.get("etag"), "\"team-1-v1\"");
    assert_eq!(b.get("name"), "b2");
    assert_eq!(b.get("etag"), "\"team-2-v2\"");
}
