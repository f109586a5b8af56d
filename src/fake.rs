// src/fake.rs
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Random field values for synthetic records
//!
//! Every helper draws from a caller-supplied RNG, so a seeded generator
//! reproduces the same field sequence.

use rand::seq::IndexedRandom;
use rand::Rng;

const HTTP_METHODS: &[&str] = &["GET", "POST", "PUT", "PATCH", "DELETE", "HEAD", "OPTIONS"];

const HTTP_VERSIONS: &[&str] = &["HTTP/1.0", "HTTP/1.1", "HTTP/2.0"];

const HTTP_STATUS: &[u16] = &[
    200, 200, 200, 200, 201, 204, 301, 302, 304, 400, 401, 403, 404, 404, 405, 406, 500, 501,
    502, 503, 504,
];

const TLDS: &[&str] = &["com", "net", "org", "io", "biz", "info", "name"];

const WORDS: &[&str] = &[
    "aggregate", "architect", "bandwidth", "benchmark", "brand", "channels", "cloud",
    "communities", "content", "convergence", "cross-platform", "deliverables", "deploy",
    "dynamic", "e-business", "e-commerce", "efficient", "empower", "enable", "engage",
    "enterprise", "extensible", "frictionless", "functionalities", "grow", "holistic",
    "incentivize", "infrastructures", "initiatives", "innovate", "integrate", "interfaces",
    "leverage", "markets", "matrix", "metrics", "mindshare", "models", "monetize", "networks",
    "optimize", "orchestrate", "paradigms", "partnerships", "platforms", "portals", "real-time",
    "relationships", "revolutionize", "scalable", "schemas", "seamless", "solutions",
    "strategic", "streamline", "supply-chains", "synergies", "synthesize", "systems",
    "target", "technologies", "transform", "users", "vertical", "viral", "visionary",
    "web-readiness",
];

const FIRST_NAMES: &[&str] = &[
    "alice", "bob", "carol", "dave", "erin", "frank", "grace", "heidi", "ivan", "judy",
    "mallory", "niaj", "olivia", "peggy", "rupert", "sybil", "trent", "victor", "walter",
];

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_1 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Mobile/15E148",
    "Opera/9.80 (X11; Linux i686; U; ru) Presto/2.8.131 Version/11.11",
    "curl/8.4.0",
];

const HACKER_NOUNS: &[&str] = &[
    "driver", "protocol", "bandwidth", "panel", "microchip", "program", "port", "card",
    "array", "interface", "system", "sensor", "firewall", "hard drive", "pixel", "alarm",
    "feed", "monitor", "application", "transmitter", "bus", "circuit", "capacitor", "matrix",
];

const HACKER_ADJECTIVES: &[&str] = &[
    "auxiliary", "primary", "back-end", "digital", "open-source", "virtual", "cross-platform",
    "redundant", "online", "haptic", "multi-byte", "bluetooth", "wireless", "1080p", "neural",
    "optical", "solid state", "mobile",
];

const HACKER_VERBS: &[&str] = &[
    "back up", "bypass", "hack", "override", "compress", "copy", "navigate", "index",
    "connect", "generate", "quantify", "calculate", "synthesize", "input", "transmit",
    "program", "reboot", "parse",
];

const HACKER_ABBREVIATIONS: &[&str] = &[
    "TCP", "HTTP", "SDD", "RAM", "GB", "CSS", "SSL", "AGP", "SQL", "FTP", "PCI", "AI", "ADP",
    "RSS", "XML", "EXE", "COM", "HDD", "THX", "SMTP", "SMS", "USB", "PNG", "XSS", "SFTP",
    "JSON",
];

const HTTP_EXTENSIONS: &[&str] = &["", "", "", ".html", ".php", ".js", ".css", ".png", ".json"];

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, items: &[&'a str]) -> &'a str {
    items.choose(rng).copied().unwrap_or_default()
}

/// Dotted-quad IPv4 address, never in 0.0.0.0/8 or multicast space
pub fn ipv4<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "{}.{}.{}.{}",
        rng.random_range(1..=223u8),
        rng.random::<u8>(),
        rng.random::<u8>(),
        rng.random_range(1..=254u8)
    )
}

/// Client port in the ephemeral range
pub fn port<R: Rng + ?Sized>(rng: &mut R) -> u16 {
    rng.random_range(1024..=65535)
}

/// Remote user identity, `-` roughly half the time as real access logs show
pub fn user_identifier<R: Rng + ?Sized>(rng: &mut R) -> String {
    if rng.random_bool(0.5) {
        "-".to_string()
    } else {
        format!("{}{}", pick(rng, FIRST_NAMES), rng.random_range(1..=9999u16))
    }
}

pub fn http_method<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    pick(rng, HTTP_METHODS)
}

pub fn http_version<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    pick(rng, HTTP_VERSIONS)
}

pub fn http_status<R: Rng + ?Sized>(rng: &mut R) -> u16 {
    HTTP_STATUS.choose(rng).copied().unwrap_or(200)
}

/// Response size in bytes
pub fn response_bytes<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.random_range(0..=30000)
}

/// Absolute request path such as `/optimize/scalable/metrics.php`
pub fn request_path<R: Rng + ?Sized>(rng: &mut R) -> String {
    let depth = rng.random_range(1..=3);
    let mut path = String::new();
    for _ in 0..depth {
        path.push('/');
        path.push_str(pick(rng, WORDS));
    }
    path.push_str(pick(rng, HTTP_EXTENSIONS));
    path
}

pub fn domain<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("{}.{}", pick(rng, WORDS), pick(rng, TLDS))
}

/// Referer URL
pub fn url<R: Rng + ?Sized>(rng: &mut R) -> String {
    let domain = domain(rng);
    let path = request_path(rng);
    format!("https://www.{domain}{path}")
}

pub fn user_agent<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    pick(rng, USER_AGENTS)
}

/// Single lowercase word, used for application and module names
pub fn word<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    pick(rng, WORDS)
}

pub fn pid<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.random_range(1..=10000)
}

/// Short sentence in the style of a system message
pub fn phrase<R: Rng + ?Sized>(rng: &mut R) -> String {
    let abbreviation = pick(rng, HACKER_ABBREVIATIONS);
    let adjective = pick(rng, HACKER_ADJECTIVES);
    let noun = pick(rng, HACKER_NOUNS);
    let verb = pick(rng, HACKER_VERBS);
    match rng.random_range(0..4) {
        0 => format!("If we {verb} the {noun}, we can get to the {abbreviation} {noun} through the {adjective} {abbreviation} {noun}!"),
        1 => format!("We need to {verb} the {adjective} {abbreviation} {noun}!"),
        2 => format!("Try to {verb} the {abbreviation} {noun}, maybe it will {verb} the {adjective} {noun}!"),
        _ => format!("The {abbreviation} {noun} is down, {verb} the {adjective} {noun} so we can {verb} the {abbreviation} {noun}!"),
    }
}

/// Free-text message; exactly `length` bytes when `length > 0`, one phrase otherwise
pub fn message<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    if length == 0 {
        return phrase(rng);
    }
    let mut text = String::with_capacity(length + 128);
    while text.len() < length {
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(&phrase(rng));
    }
    // vocabulary is ASCII, so any byte offset is a char boundary
    text.truncate(length);
    text
}
