//! Group members example.
//!
//! Logs in with a `.ROBLOSECURITY` cookie, prints a group's roles and then
//! streams its member list.
//!
//! Run with: ROBLOSECURITY=... cargo run --example group_members -- 1200769

use futures_util::StreamExt;

use blox_rs::{BloxClient, GroupId};

#[tokio::main]
async fn main() -> blox_rs::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cookie = std::env::var("ROBLOSECURITY")
        .expect("ROBLOSECURITY environment variable required");
    let group_id: u64 = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(1200769);

    println!("Connecting to Roblox...");
    let client = BloxClient::login(cookie).await?;
    if let Some(user) = client.session().user().await {
        println!("Logged in as {} ({})", user.name, user.user_id);
    }

    let mut group = client.group(GroupId::new(group_id));
    println!("\nGroup: {}", group.fetch_name().await?);

    let roles = group.roles().await?;
    println!("\n{} role(s):", roles.len());
    for role in &roles {
        println!(
            "  - {:<24} rank {:>3}  members {}",
            role.name,
            role.rank,
            role.member_count.unwrap_or_default()
        );
    }

    println!("\nMembers:");
    let mut members = client.groups().members_stream(GroupId::new(group_id));
    let mut count = 0usize;
    while let Some(member) = members.next().await {
        let member = member?;
        count += 1;
        if count <= 25 {
            println!("  - {} ({})", member.username, member.user_id);
        }
    }
    println!("  ... {count} member(s) in total");

    client.close().await;
    println!("\nDone!");
    Ok(())
}
