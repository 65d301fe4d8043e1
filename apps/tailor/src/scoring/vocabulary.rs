//! Curated domain-term vocabulary for keyword extraction.
//!
//! Immutable configuration, loaded once at process start. Every term is
//! lowercase because extraction lowercases the input before matching.
//! Single-letter languages ("C", "R", "Go") are listed by their unambiguous
//! spellings only — a bare "go" matches half the English language.

/// Ordered vocabulary; extraction preserves this order so keyword sets and
/// missing-keyword diagnostics are deterministic.
pub const VOCABULARY: &[&str] = &[
    // Programming languages
    "python",
    "java",
    "typescript",
    "javascript",
    "c++",
    "c#",
    "rust",
    "golang",
    "kotlin",
    "swift",
    "ruby",
    "scala",
    "sql",
    "bash",
    // Web frameworks and libraries
    "react",
    "next.js",
    "node.js",
    "express",
    "fastapi",
    "django",
    "flask",
    "spring boot",
    "rails",
    "tailwind",
    "graphql",
    "rest api",
    "grpc",
    // Datastores
    "postgresql",
    "mysql",
    "sqlite",
    "mongodb",
    "redis",
    "elasticsearch",
    "dynamodb",
    "kafka",
    // Platforms and infrastructure
    "aws",
    "gcp",
    "azure",
    "docker",
    "kubernetes",
    "terraform",
    "linux",
    "github actions",
    "jenkins",
    "ci/cd",
    "serverless",
    "microservices",
    // Methodologies
    "agile",
    "scrum",
    "tdd",
    "oauth",
    "rbac",
    "distributed systems",
    "system design",
    // AI/ML
    "machine learning",
    "deep learning",
    "pytorch",
    "tensorflow",
    "scikit-learn",
    "nlp",
    "llm",
    "langchain",
    "openai",
    "embeddings",
    "recommendation",
    "computer vision",
];
