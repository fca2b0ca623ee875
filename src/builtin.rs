pub const BUILTIN_CSS: &str = include_str!("builtin.css");

/// Placeholder in [`PAGE_JS`] replaced by the page's JSON configuration.
pub const CONFIG_PLACEHOLDER: &str = "__PACKHUB_CONFIG__";

pub const PAGE_JS: &str = r#"(function () {
  var config = __PACKHUB_CONFIG__;
  var body = document.body;
  var toggle = document.getElementById("themeToggleBtn");
  var darkQuery = window.matchMedia ? window.matchMedia("(prefers-color-scheme: dark)") : null;
  var githubRegex = /https?:\/\/github\.com\/([^\/]+)\/([^\/]+)/;
  var revertTimers = {};

  function systemPrefersDark() {
    return !!(darkQuery && darkQuery.matches);
  }

  function readPreference() {
    try {
      return localStorage.getItem(config.theme.key);
    } catch (_) {
      return null;
    }
  }

  function writePreference(value) {
    try {
      if (value === null) {
        localStorage.removeItem(config.theme.key);
      } else {
        localStorage.setItem(config.theme.key, value);
      }
    } catch (_) {}
  }

  function decodeMode(stored) {
    if (config.theme.storage === "binary") {
      return stored === "active" ? "dark" : "light";
    }
    if (stored === "light" || stored === "dark" || stored === "system") {
      return stored;
    }
    return "system";
  }

  function applyTheme(mode) {
    if (config.theme.storage === "binary") {
      body.classList.toggle("darkmode", mode === "dark");
      writePreference(mode === "dark" ? "active" : null);
    } else {
      body.className = mode;
      writePreference(mode);
    }
    if (toggle) {
      toggle.setAttribute("data-mode", mode);
      toggle.setAttribute("title", "Theme: " + mode);
    }
  }

  var currentMode = decodeMode(readPreference());
  applyTheme(currentMode);

  if (toggle) {
    toggle.addEventListener("click", function () {
      if (config.theme.storage === "binary") {
        currentMode = currentMode === "dark" ? "light" : "dark";
      } else if (currentMode === "system") {
        currentMode = systemPrefersDark() ? "light" : "dark";
      } else {
        currentMode = "system";
      }
      applyTheme(currentMode);
    });
  }

  if (darkQuery && darkQuery.addEventListener) {
    darkQuery.addEventListener("change", function () {
      if (currentMode === "system") {
        applyTheme("system");
      }
    });
  }

  function commandFor(target, owner, repo) {
    return "wget -qO- " + config.scheme + "://" + config.host + "/sh/" + target.path +
      "/github/" + owner + "/" + repo + config.query + " | sh";
  }

  function updateCommands(value) {
    var match = value.match(githubRegex);
    if (!match) {
      console.log("Invalid or missing GitHub URL");
      return;
    }
    config.targets.forEach(function (target) {
      var el = document.querySelector(".command." + target.key);
      if (el) {
        el.textContent = commandFor(target, match[1], match[2]);
      }
    });
  }

  function copyCommand(target) {
    var command = document.querySelector(".command." + target.key);
    var status = document.getElementById("copy-status-message-" + target.key);
    if (!command || !navigator.clipboard) {
      console.log("Hit a snag when copying to clipboard: clipboard unavailable");
      return;
    }
    navigator.clipboard.writeText(command.textContent).then(function () {
      if (!status) {
        return;
      }
      status.style.opacity = "1";
      clearTimeout(revertTimers[target.key]);
      revertTimers[target.key] = setTimeout(function () {
        status.style.opacity = "0";
      }, config.revertDelayMs);
    }, function (e) {
      console.log("Hit a snag when copying to clipboard: ", e);
    });
  }

  config.targets.forEach(function (target) {
    var button = document.getElementById("copy-button-" + target.key);
    if (button) {
      button.addEventListener("click", function () {
        copyCommand(target);
      });
    }
  });

  var input = document.querySelector(".github-link");
  if (input) {
    var currentValue = function () {
      return input.value || input.placeholder;
    };
    updateCommands(currentValue());
    input.addEventListener("input", function () {
      updateCommands(currentValue());
    });
  }
})();"#;
