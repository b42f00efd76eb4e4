//! Scenario tests driving model, controller and view together
