//! Static portfolio catalog: owner identity, projects, experience, skills.
//!
//! The catalog is built once at startup with [`Catalog::builtin()`] and handed
//! out by reference to the terminal, the assistant prompt builder, the CLI
//! renderers and the local server. Nothing mutates it after construction.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Project grouping shown as a badge in the gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Category {
    #[serde(rename = "Distributed Systems")]
    DistributedSystems,
    #[serde(rename = "Computer Vision")]
    ComputerVision,
    Web,
    Other,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DistributedSystems => write!(f, "Distributed Systems"),
            Self::ComputerVision => write!(f, "Computer Vision"),
            Self::Web => write!(f, "Web"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// A single project in the gallery.
#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub tags: &'static [&'static str],
    /// Link to the source repository.
    pub source: &'static str,
    /// Optional live deployment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo: Option<&'static str>,
    pub category: Category,
}

/// A single entry on the experience timeline.
#[derive(Debug, Clone, Serialize)]
pub struct Experience {
    pub company: &'static str,
    pub role: &'static str,
    pub location: &'static str,
    pub period: &'static str,
    pub highlights: &'static [&'static str],
}

/// Self-assessed proficiency, 0-100.
#[derive(Debug, Clone, Serialize)]
pub struct Skill {
    pub name: &'static str,
    pub level: u8,
}

/// Who the portfolio belongs to.
#[derive(Debug, Clone, Serialize)]
pub struct Owner {
    pub name: &'static str,
    pub headline: &'static str,
    pub email: &'static str,
    pub source_profile: &'static str,
    pub languages: &'static [&'static str],
    pub tools: &'static [&'static str],
}

/// The full, immutable portfolio catalog.
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    pub owner: Owner,
    pub projects: Vec<Project>,
    pub experience: Vec<Experience>,
    pub skills: Vec<Skill>,
}

// ---------------------------------------------------------------------------
// Built-in data
// ---------------------------------------------------------------------------

impl Catalog {
    /// The catalog compiled into the binary.
    pub fn builtin() -> Self {
        Self {
            owner: Owner {
                name: "Ayman Ougri",
                headline: "Systems Engineer. Passionate about C++, Rust, and performant code.",
                email: "waougri@gmail.com",
                source_profile: "github.com/waougri",
                languages: &["C++", "Rust", "TS", "Python", "Go"],
                tools: &["Docker", "K8s", "Linux", "AWS"],
            },
            projects: vec![
                Project {
                    id: "httpxx",
                    title: "HTTPxx",
                    description: "High-Performance Web Server built in C++ with full multi-threading support. \
                                  Optimized memory management and request/response handling, achieving \
                                  15,000 requests/second and 35% throughput improvement.",
                    tags: &["C++20", "Multi-threading", "Systems", "Optimized"],
                    source: "https://github.com/waougri/httpxx",
                    demo: None,
                    category: Category::DistributedSystems,
                },
                Project {
                    id: "crown-point",
                    title: "Crown Point Consulting",
                    description: "Developed corporate website and internal tools featuring responsive design, \
                                  HTTP/2 support, CDN optimization, and PWA functionality using modern web tech.",
                    tags: &["Tailwind CSS", "Alpine.js", "Netlify", "PWA"],
                    source: "https://github.com/waougri/crown_point",
                    demo: Some("https://crownpointconsult.com/"),
                    category: Category::Web,
                },
                Project {
                    id: "graphxx",
                    title: "Graphxx",
                    description: "Mathematical Function Visualizer in C++ using SFML. Achieved 40% performance \
                                  improvement for computation-intensive visualization tasks.",
                    tags: &["C++", "SFML", "Graphics", "Math"],
                    source: "https://github.com/waougri/Graphxx",
                    demo: None,
                    category: Category::Other,
                },
                Project {
                    id: "giftint",
                    title: "Giftint",
                    description: "Rust experiment in GIF recoloring. Remaps existing animated GIF colors to \
                                  custom palettes like Catppuccin or Gruvbox.",
                    tags: &["Rust", "Image Processing", "CLI"],
                    source: "https://github.com/waougri/giftint",
                    demo: None,
                    category: Category::Other,
                },
            ],
            experience: vec![
                Experience {
                    company: "VNB-IT",
                    role: "Backend Developer Intern",
                    location: "Remote, France",
                    period: "2025-09 - 2025-10",
                    highlights: &[
                        "Designed and maintained secure RESTful APIs using Node.js and Express.js.",
                        "Optimized PostgreSQL databases with query optimization and transaction handling.",
                        "Implemented JWT-based authentication and RBAC.",
                        "Wrote comprehensive unit and integration tests using Jest/Mocha.",
                    ],
                },
                Experience {
                    company: "AXENTRA OS",
                    role: "Python & FastAPI Backend Intern",
                    location: "Remote, United States",
                    period: "2024-10 - 2025-11",
                    highlights: &[
                        "Developed and maintained RESTful APIs using FastAPI and Python.",
                        "Implemented real-time API integration with Shiprocket handling webhooks.",
                        "Built secure webhook endpoints with request validation and error handling.",
                        "Worked with PostgreSQL and MySQL including schema design and optimization.",
                    ],
                },
                Experience {
                    company: "Starlith",
                    role: "Lead Freelance Software Engineer",
                    location: "Remote",
                    period: "2023-08 - Present",
                    highlights: &[
                        "Deliver full-stack software solutions and system architecture.",
                        "Design and maintain scalable web applications, internal tools, and dashboards.",
                        "Build core business logic and infrastructure using C++, Rust, C#, Python, TypeScript, and Java.",
                        "Apply computer science fundamentals to solve real-world engineering problems.",
                    ],
                },
            ],
            skills: vec![
                Skill { name: "C++", level: 90 },
                Skill { name: "Rust", level: 85 },
                Skill { name: "TypeScript", level: 88 },
                Skill { name: "Python", level: 82 },
                Skill { name: "System Design", level: 75 },
                Skill { name: "DevOps", level: 70 },
            ],
        }
    }

    /// Projects to show, optionally capped at `limit`.
    pub fn projects(&self, limit: Option<usize>) -> &[Project] {
        match limit {
            Some(n) if n < self.projects.len() => &self.projects[..n],
            _ => &self.projects,
        }
    }

    /// Look up a project by its id (case-insensitive).
    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id.eq_ignore_ascii_case(id))
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projects_limit_caps_the_slice() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.projects(Some(3)).len(), 3);
        assert_eq!(catalog.projects(Some(99)).len(), catalog.projects.len());
        assert_eq!(catalog.projects(None).len(), catalog.projects.len());
    }

    #[test]
    fn project_lookup_ignores_case() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.project("GIFTINT").map(|p| p.title), Some("Giftint"));
        assert!(catalog.project("missing").is_none());
    }

    #[test]
    fn category_serializes_with_display_name() {
        let json = serde_json::to_string(&Category::DistributedSystems).unwrap();
        assert_eq!(json, "\"Distributed Systems\"");
    }
}
