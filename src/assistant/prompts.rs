//! System instruction for the portfolio assistant.
//!
//! The model gets no tools and no retrieval: everything it may say about the
//! owner is serialized into the system instruction here, once per process.

use crate::catalog::Catalog;
use crate::config::schema::IdentityConfig;

/// Build the fixed system instruction from the catalog.
///
/// Projects and experience are embedded as plain text lines so the model can
/// quote them back. The closing rules keep answers short and on-topic.
pub fn build_system_instruction(catalog: &Catalog, identity: &IdentityConfig) -> String {
    let owner = &catalog.owner;
    let mut out = String::new();

    out.push_str(&format!(
        "You are an AI assistant for {}'s developer portfolio.\n",
        owner.name
    ));
    out.push_str(&format!("Background: {}\n", owner.headline));
    out.push_str(&format!(
        "Source profile: {} (username '{}').\n",
        owner.source_profile, identity.source_host_username
    ));
    out.push_str(&format!(
        "Coding-judge username: '{}'.\n",
        identity.judge_username
    ));
    out.push_str(&format!("Contact: {}\n", owner.email));

    out.push_str("\nProjects:\n");
    for p in &catalog.projects {
        out.push_str(&format!(
            "- {} [{}]: {} (Tech: {})\n",
            p.title,
            p.category,
            p.description,
            p.tags.join(", ")
        ));
    }

    out.push_str("\nExperience:\n");
    for e in &catalog.experience {
        out.push_str(&format!(
            "- {} at {} ({}, {}): {}\n",
            e.role,
            e.company,
            e.location,
            e.period,
            e.highlights.join(" ")
        ));
    }

    out.push_str("\nSkills: ");
    out.push_str(
        &catalog
            .skills
            .iter()
            .map(|s| format!("{} {}%", s.name, s.level))
            .collect::<Vec<_>>()
            .join(", "),
    );
    out.push('\n');

    out.push_str(
        "\nBe professional, technical and concise. Keep answers under 50 words \
         unless detailed information is requested. If asked about anything not \
         covered above, say you only know about the engineering work listed here.\n",
    );

    out
}
