//! Built-in footer sets for the two copies of the site.

use crate::config::PatchConfig;
use std::fmt;
use std::str::FromStr;

/// Footer for the Action Soccer and Cricket Arena pages.
pub const ACTION_ARENA_FOOTER: &str = r#"    <!-- Footer -->
    <footer class="footer">
        <div class="container">
            <div class="row g-4">
                <div class="col-md-4">
                    <h5 class="footer-title">Action Soccer and Cricket Arena</h5>
                    <p class="footer-text">Port Shepstone's premier action soccer and cricket arena offering professional facilities and seamless online booking.</p>
                    <div class="social-links">
                        <a href="https://www.facebook.com/dobusinessbetter" target="_blank" rel="noopener noreferrer" title="Facebook"><i class="bi bi-facebook"></i></a>
                        <a href="https://x.com/DoBusinessBest/status/1772639848089657487" target="_blank" rel="noopener noreferrer" title="X (Twitter)"><i class="bi bi-twitter-x"></i></a>
                        <a href="https://www.instagram.com/lockhat_inc" target="_blank" rel="noopener noreferrer" title="Instagram"><i class="bi bi-instagram"></i></a>
                        <a href="https://www.youtube.com/channel/UCtm7tInOPo9XdNdNcxn3Ufw" target="_blank" rel="noopener noreferrer" title="YouTube"><i class="bi bi-youtube"></i></a>
                    </div>
                </div>
                <div class="col-md-4">
                    <h5 class="footer-title">Quick Links</h5>
                    <ul class="footer-links">
                        <li><a href="facilities.html">Facilities</a></li>
                        <li><a href="pricing.html">Pricing</a></li>
                        <li><a href="booking.html">Book Now</a></li>
                        <li><a href="about.html">About Us</a></li>
                        <li><a href="contact.html">Contact</a></li>
                    </ul>
                </div>
                <div class="col-md-4">
                    <h5 class="footer-title">Contact Information</h5>
                    <ul class="footer-links">
                        <li>Address: Near 13 Fairview, Port Shepstone, KwaZulu-Natal</li>
                        <li>Key access via Coastal Accounting premises</li>
                        <li>Emergency: 10111 (Police), 10177 (Ambulance)</li>
                        <li>Fire Emergency: 10111</li>
                    </ul>
                </div>
            </div>
            <hr class="footer-divider">
            <div class="footer-bottom">
                <p>&copy; 2025 Action Soccer and Cricket Arena. All rights reserved. | Powered by South African Innovation</p>
            </div>
        </div>
    </footer>"#;

/// Footer for the Cricket Net Arena pages.
pub const CRICKET_NETS_FOOTER: &str = r#"    <!-- Footer -->
    <footer class="footer">
        <div class="container">
            <div class="row g-4">
                <div class="col-md-4">
                    <h5 class="footer-title">Cricket Net Arena</h5>
                    <p class="footer-text">Indoor cricket nets in Port Shepstone with bowling machines, floodlights and online booking.</p>
                </div>
                <div class="col-md-4">
                    <h5 class="footer-title">Quick Links</h5>
                    <ul class="footer-links">
                        <li><a href="facilities.html">Facilities</a></li>
                        <li><a href="pricing.html">Pricing</a></li>
                        <li><a href="booking.html">Book Now</a></li>
                        <li><a href="contact.html">Contact</a></li>
                    </ul>
                </div>
                <div class="col-md-4">
                    <h5 class="footer-title">Contact Information</h5>
                    <ul class="footer-links">
                        <li>Address: 13 Fairview Terrace, Port Shepstone, 4240</li>
                        <li>Email: luke@l-inc.co.za</li>
                        <li>Emergency: 10111 (Police), 10177 (Ambulance)</li>
                    </ul>
                </div>
            </div>
            <hr class="footer-divider">
            <div class="footer-bottom">
                <p>&copy; 2025 Cricket Net Arena. All rights reserved.</p>
            </div>
        </div>
    </footer>"#;

const ACTION_ARENA_PAGES: &[&str] = &[
    "index.html",
    "pricing.html",
    "booking.html",
    "about.html",
    "contact.html",
    "facilities.html",
];

const CRICKET_NETS_PAGES: &[&str] = &[
    "index.html",
    "booking.html",
    "facilities.html",
    "pricing.html",
    "contact.html",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    ActionArena,
    CricketNets,
}

impl Preset {
    pub const ALL: [Preset; 2] = [Preset::ActionArena, Preset::CricketNets];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::ActionArena => "action-arena",
            Preset::CricketNets => "cricket-nets",
        }
    }

    /// Default location of the pages, relative to the checkout root.
    pub fn default_root(&self) -> &'static str {
        match self {
            Preset::ActionArena => "package (1)/cricket-arena-booking/frontend",
            Preset::CricketNets => "CricketSite/cricket-arena-booking/frontend",
        }
    }

    pub fn template(&self) -> &'static str {
        match self {
            Preset::ActionArena => ACTION_ARENA_FOOTER,
            Preset::CricketNets => CRICKET_NETS_FOOTER,
        }
    }

    pub fn pages(&self) -> &'static [&'static str] {
        match self {
            Preset::ActionArena => ACTION_ARENA_PAGES,
            Preset::CricketNets => CRICKET_NETS_PAGES,
        }
    }

    pub fn config(&self) -> PatchConfig {
        PatchConfig::new(
            self.default_root(),
            self.pages().iter().map(|p| p.to_string()).collect(),
            self.template(),
        )
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| {
                format!(
                    "unknown preset '{}', expected one of: {}",
                    s,
                    Preset::ALL.map(|p| p.name()).join(", ")
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid_configs() {
        for preset in Preset::ALL {
            let config = preset.config();
            assert!(config.validate().is_ok(), "{} is invalid", preset);
            assert_eq!(config.pages.len(), preset.pages().len());
        }
    }

    #[test]
    fn test_presets_differ_only_in_data() {
        let a = Preset::ActionArena.config();
        let b = Preset::CricketNets.config();
        assert_eq!(a.marker, b.marker);
        assert_ne!(a.template, b.template);
        assert_ne!(a.root, b.root);
    }

    #[test]
    fn test_preset_parsing() {
        assert_eq!("action-arena".parse::<Preset>(), Ok(Preset::ActionArena));
        assert_eq!("cricket-nets".parse::<Preset>(), Ok(Preset::CricketNets));
        let err = "nope".parse::<Preset>().unwrap_err();
        assert!(err.contains("action-arena, cricket-nets"));
    }
}
