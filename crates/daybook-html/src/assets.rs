//! Inline stylesheet and script embedded in the index page.

pub(crate) const STYLE: &str = r"
body { font-family: sans-serif; padding: 2rem; color: #222; }
h1 { text-align: center; }
.tabs { display: flex; flex-wrap: wrap; gap: 0.25rem; border-bottom: 1px solid #ccc; margin-bottom: 1rem; }
.tab { border: 1px solid #ccc; border-bottom: none; background: #f5f5f5; padding: 0.4rem 0.8rem; cursor: pointer; }
.tab.active { background: #fff; font-weight: bold; }
.tab-panel { display: none; }
.tab-panel.active { display: block; }
.project { margin-bottom: 1rem; border: 1px solid #eee; }
.project-toggle { width: 100%; text-align: left; font-size: 1.1rem; font-weight: bold; padding: 0.5rem; background: #fafafa; border: none; cursor: pointer; }
.project-body { display: none; padding: 0 1rem; }
.project.open .project-body { display: block; }
ul { line-height: 1.6; }
";

pub(crate) const SCRIPT: &str = r"
(function () {
  var tabs = document.querySelectorAll('.tab');
  var panels = document.querySelectorAll('.tab-panel');
  tabs.forEach(function (tab) {
    tab.addEventListener('click', function () {
      tabs.forEach(function (t) { t.classList.remove('active'); });
      panels.forEach(function (p) { p.classList.remove('active'); });
      tab.classList.add('active');
      var panel = document.getElementById(tab.getAttribute('data-tab'));
      if (panel) { panel.classList.add('active'); }
    });
  });
  document.querySelectorAll('.project-toggle').forEach(function (toggle) {
    toggle.addEventListener('click', function () {
      var section = document.getElementById(toggle.getAttribute('data-target'));
      if (section) { section.classList.toggle('open'); }
    });
  });
})();
";
