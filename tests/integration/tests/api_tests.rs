//! API integration tests
//!
//! Run against a live PostgreSQL named by `DATABASE_URL`; Discord is mocked
//! in-process. Every test uses its own mock guild and fresh Discord ids so
//! tests can share one database.

use integration_tests::mock_discord::MockCall;
use integration_tests::*;
use reqwest::StatusCode;
use serde_json::{json, Value};

const UNRELATED_ROLE: i64 = 42;

async fn setup() -> anyhow::Result<(MockDiscord, TestServer, String)> {
    let discord = MockDiscord::start().await?;
    let server = TestServer::start(&discord).await?;
    let token = server.login().await?;
    Ok((discord, server, token))
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() -> anyhow::Result<()> {
    if !check_test_env() {
        return Ok(());
    }
    let discord = MockDiscord::start().await?;
    let server = TestServer::start(&discord).await?;

    let body: Value = assert_json(server.get("/health").await?, StatusCode::OK).await?;
    assert_eq!(body["status"], "healthy");

    let body: Value = assert_json(server.get("/health/ready").await?, StatusCode::OK).await?;
    assert_eq!(body["checks"]["database"], "healthy");
    Ok(())
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_login_and_current_admin() -> anyhow::Result<()> {
    if !check_test_env() {
        return Ok(());
    }
    let (_discord, server, token) = setup().await?;

    let me: Value = assert_json(server.get_auth("/auth/me", &token).await?, StatusCode::OK).await?;
    assert_eq!(me["email"], server.admin_email.as_str());
    Ok(())
}

#[tokio::test]
async fn test_login_wrong_password() -> anyhow::Result<()> {
    if !check_test_env() {
        return Ok(());
    }
    let discord = MockDiscord::start().await?;
    let server = TestServer::start(&discord).await?;

    let response = server
        .post(
            "/auth/login",
            &LoginRequest {
                email: server.admin_email.clone(),
                password: "not-the-password".to_string(),
            },
        )
        .await?;
    let body: ErrorBody = assert_json(response, StatusCode::UNAUTHORIZED).await?;
    assert_eq!(body.error.code, "INVALID_CREDENTIALS");
    Ok(())
}

#[tokio::test]
async fn test_members_require_session() -> anyhow::Result<()> {
    if !check_test_env() {
        return Ok(());
    }
    let discord = MockDiscord::start().await?;
    let server = TestServer::start(&discord).await?;

    assert_status(server.get("/members").await?, StatusCode::UNAUTHORIZED).await
}

// ============================================================================
// Member CRUD Tests
// ============================================================================

#[tokio::test]
async fn test_member_upsert_list_delete() -> anyhow::Result<()> {
    if !check_test_env() {
        return Ok(());
    }
    let (_discord, server, token) = setup().await?;
    let discord_id = unique_discord_id();

    let created: MemberResponse = assert_json(
        server
            .post_auth("/members", &token, &MemberRow::new(discord_id, "design"))
            .await?,
        StatusCode::OK,
    )
    .await?;
    assert_eq!(created.discord_id, discord_id.to_string());
    assert_eq!(created.department, "DESIGN");

    // Same Discord id updates in place
    let updated: MemberResponse = assert_json(
        server
            .post_auth("/members", &token, &MemberRow::new(discord_id, "MARKETING"))
            .await?,
        StatusCode::OK,
    )
    .await?;
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.department, "MARKETING");

    let members: Vec<MemberResponse> =
        assert_json(server.get_auth("/members", &token).await?, StatusCode::OK).await?;
    assert!(members
        .iter()
        .any(|m| m.discord_id == discord_id.to_string()));

    let path = format!("/members/{discord_id}");
    assert_status(server.delete_auth(&path, &token).await?, StatusCode::OK).await?;

    let body: ErrorBody =
        assert_json(server.delete_auth(&path, &token).await?, StatusCode::NOT_FOUND).await?;
    assert_eq!(body.error.code, "UNKNOWN_MEMBER");
    Ok(())
}

#[tokio::test]
async fn test_member_rejects_unknown_department() -> anyhow::Result<()> {
    if !check_test_env() {
        return Ok(());
    }
    let (_discord, server, token) = setup().await?;

    let response = server
        .post_auth(
            "/members",
            &token,
            &MemberRow::new(unique_discord_id(), "Finance"),
        )
        .await?;
    assert_status(response, StatusCode::BAD_REQUEST).await
}

// ============================================================================
// Import Tests
// ============================================================================

#[tokio::test]
async fn test_bulk_import_is_all_or_nothing() -> anyhow::Result<()> {
    if !check_test_env() {
        return Ok(());
    }
    let (_discord, server, token) = setup().await?;
    let good = unique_discord_id();
    let bad = unique_discord_id();

    let rows = vec![
        MemberRow::new(good, "TECHNICAL"),
        MemberRow::new(bad, "Finance"),
    ];
    let body: ErrorBody = assert_json(
        server.post_auth("/members/bulk", &token, &rows).await?,
        StatusCode::BAD_REQUEST,
    )
    .await?;
    assert!(body.error.message.contains("row 2"), "{}", body.error.message);

    let members: Vec<MemberResponse> =
        assert_json(server.get_auth("/members", &token).await?, StatusCode::OK).await?;
    assert!(!members.iter().any(|m| m.discord_id == good.to_string()));

    let rows = vec![MemberRow::new(good, "TECHNICAL"), MemberRow::new(bad, "design")];
    let imported: ImportResponse = assert_json(
        server.post_auth("/members/bulk", &token, &rows).await?,
        StatusCode::OK,
    )
    .await?;
    assert_eq!(imported.imported, 2);
    Ok(())
}

#[tokio::test]
async fn test_table_import() -> anyhow::Result<()> {
    if !check_test_env() {
        return Ok(());
    }
    let (_discord, server, token) = setup().await?;
    let first = unique_discord_id();
    let second = unique_discord_id();

    let table = format!(
        "Name\tDiscord ID\tEmail\tDepartment\tRole\n\
         Ada\t{first}\tada@example.com\tTechnical\tCore Member\n\
         Grace\t{second}\t\tManagement\tMember\n"
    );
    let imported: ImportResponse = assert_json(
        server.post_text_auth("/members/import", &token, table).await?,
        StatusCode::OK,
    )
    .await?;
    assert_eq!(imported.imported, 2);
    assert_eq!(imported.members[0].email.as_deref(), Some("ada@example.com"));
    assert_eq!(imported.members[1].department, "MANAGEMENT");

    let broken = format!("name,discord_id,department,role\nBob,{first},Finance,MEMBER\n");
    let body: ErrorBody = assert_json(
        server.post_text_auth("/members/import", &token, broken).await?,
        StatusCode::BAD_REQUEST,
    )
    .await?;
    assert!(body.error.message.contains("line 2"), "{}", body.error.message);
    Ok(())
}

// ============================================================================
// Role Sync Tests
// ============================================================================

#[tokio::test]
async fn test_sync_rejects_wrong_key() -> anyhow::Result<()> {
    if !check_test_env() {
        return Ok(());
    }
    let discord = MockDiscord::start().await?;
    let server = TestServer::start(&discord).await?;

    let body: ErrorBody = assert_json(
        server.post("/roles/sync", &json!({ "key": "wrong" })).await?,
        StatusCode::UNAUTHORIZED,
    )
    .await?;
    assert_eq!(body.error.code, "INVALID_SYNC_KEY");
    assert!(discord.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_sync_converges_guild_roles() -> anyhow::Result<()> {
    if !check_test_env() {
        return Ok(());
    }
    let (discord, server, token) = setup().await?;
    let switching = unique_discord_id();
    let settled = unique_discord_id();
    let absent = unique_discord_id();

    discord.add_member(switching, &[TECHNICAL_ROLE, UNRELATED_ROLE]);
    discord.add_member(settled, &[MARKETING_ROLE]);

    let rows = vec![
        MemberRow::new(switching, "DESIGN"),
        MemberRow::new(settled, "MARKETING"),
        MemberRow::new(absent, "TECHNICAL"),
    ];
    assert_status(
        server.post_auth("/members/bulk", &token, &rows).await?,
        StatusCode::OK,
    )
    .await?;

    let response = server.post("/roles/sync", &json!({ "key": SYNC_KEY })).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await?, "Roles updated");

    let roles = discord.roles_of(switching).unwrap_or_default();
    assert!(roles.contains(&DESIGN_ROLE));
    assert!(roles.contains(&UNRELATED_ROLE));
    assert!(!roles.contains(&TECHNICAL_ROLE));
    assert_eq!(discord.roles_of(settled), Some(vec![MARKETING_ROLE]));

    // Removal happens before the add, and the settled member is untouched
    let updates: Vec<MockCall> = discord.calls();
    assert_eq!(updates.len(), 2);
    assert_eq!(
        updates[0],
        MockCall::SetRoles {
            user_id: switching,
            roles: vec![UNRELATED_ROLE],
        }
    );
    Ok(())
}

#[tokio::test]
async fn test_single_role_assignment() -> anyhow::Result<()> {
    if !check_test_env() {
        return Ok(());
    }
    let (discord, server, token) = setup().await?;
    let discord_id = unique_discord_id();

    discord.add_member(discord_id, &[]);
    assert_status(
        server
            .post_auth("/members", &token, &MemberRow::new(discord_id, "management"))
            .await?,
        StatusCode::OK,
    )
    .await?;

    let body: Value = assert_json(
        server
            .post(
                "/roles/single",
                &json!({
                    "memberId": discord_id.to_string(),
                    "interactionToken": "interaction-abc",
                    "key": SYNC_KEY,
                }),
            )
            .await?,
        StatusCode::OK,
    )
    .await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["response"]["content"], "departments synced!");

    assert_eq!(discord.roles_of(discord_id), Some(vec![MANAGEMENT_ROLE]));
    assert_eq!(
        discord.calls().last(),
        Some(&MockCall::EditInteraction {
            token: "interaction-abc".to_string(),
            content: "departments synced!".to_string(),
        })
    );
    Ok(())
}

#[tokio::test]
async fn test_single_role_unknown_member() -> anyhow::Result<()> {
    if !check_test_env() {
        return Ok(());
    }
    let discord = MockDiscord::start().await?;
    let server = TestServer::start(&discord).await?;

    let body: ErrorBody = assert_json(
        server
            .post(
                "/roles/single",
                &json!({
                    "member_id": unique_discord_id().to_string(),
                    "interaction_token": "interaction-xyz",
                    "key": SYNC_KEY,
                }),
            )
            .await?,
        StatusCode::NOT_FOUND,
    )
    .await?;
    assert_eq!(body.error.code, "UNKNOWN_MEMBER");
    assert!(discord.calls().is_empty());
    Ok(())
}
