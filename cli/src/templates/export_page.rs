/// Self-contained HTML player for an exported animation.
///
/// The background layer is drawn once; frame overlays are swapped on top of it.
pub const EXPORT_PAGE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{{TITLE}}</title>
<style>
  body { margin: 16px; background: #fafafa; }
  .pricereel { font-family: Arial, Helvetica, sans-serif; display: inline-block; max-width: 100%; }
  .pricereel .stage { position: relative; width: {{WIDTH}}px; max-width: 100%; aspect-ratio: {{WIDTH}} / {{HEIGHT}}; }
  .pricereel .stage img { position: absolute; top: 0; left: 0; width: 100%; height: 100%; }
  .pricereel input[type=range] { width: 100%; margin: 8px 0 4px; }
  .pricereel .controls { display: flex; flex-wrap: wrap; gap: 4px; align-items: center; }
  .pricereel .controls button { min-width: 2.5em; }
  .pricereel .counter { margin-left: auto; color: #4f4f4f; font-size: 13px; }
</style>
</head>
<body>
<div class="pricereel" id="{{ID}}" data-frame-count="{{FRAME_COUNT}}" data-interval-ms="{{INTERVAL_MS}}">
  <div class="stage">
    <img id="{{ID}}-background" alt="" src="{{BACKGROUND}}">
    <img id="{{ID}}-frame" alt="{{TITLE}}">
  </div>
  <input type="range" id="{{ID}}-slider" min="0" max="{{LAST_FRAME}}" step="1" value="0">
  <div class="controls">
    <button type="button" data-action="first" title="First frame">|&lt;</button>
    <button type="button" data-action="previous" title="Previous frame">&lt;</button>
    <button type="button" data-action="reverse" title="Play backwards">&#9664;</button>
    <button type="button" data-action="pause" title="Pause">&#10074;&#10074;</button>
    <button type="button" data-action="play" title="Play">&#9654;</button>
    <button type="button" data-action="next" title="Next frame">&gt;</button>
    <button type="button" data-action="last" title="Last frame">&gt;|</button>
    <button type="button" data-action="slower" title="Slower">&minus;</button>
    <button type="button" data-action="faster" title="Faster">+</button>
    <label><input type="radio" name="{{ID}}-mode" value="once"{{ONCE_CHECKED}}>Once</label>
    <label><input type="radio" name="{{ID}}-mode" value="loop"{{LOOP_CHECKED}}>Loop</label>
    <label><input type="radio" name="{{ID}}-mode" value="reflect"{{REFLECT_CHECKED}}>Reflect</label>
    <span class="counter" id="{{ID}}-counter"></span>
  </div>
</div>
<script>
(function () {
  "use strict";
  var id = "{{ID}}";
  var frames = {{FRAMES}};
  var root = document.getElementById(id);
  var image = document.getElementById(id + "-frame");
  var slider = document.getElementById(id + "-slider");
  var counter = document.getElementById(id + "-counter");
  var interval = {{INTERVAL_MS}};
  var current = 0;
  var direction = 1;
  var timer = null;

  function mode() {
    var checked = root.querySelector('input[name="' + id + '-mode"]:checked');
    return checked ? checked.value : "once";
  }

  function show(index) {
    current = Math.max(0, Math.min(frames.length - 1, index));
    image.src = frames[current];
    slider.value = current;
    counter.textContent = (current + 1) + " / " + frames.length;
  }

  function pause() {
    if (timer !== null) {
      clearInterval(timer);
      timer = null;
    }
  }

  function step() {
    var next = current + direction;
    if (next < 0 || next >= frames.length) {
      var m = mode();
      if (m === "loop") {
        next = direction > 0 ? 0 : frames.length - 1;
      } else if (m === "reflect" && frames.length > 1) {
        direction = -direction;
        next = current + direction;
      } else {
        pause();
        return;
      }
    }
    show(next);
  }

  function play(towards) {
    pause();
    direction = towards;
    timer = setInterval(step, interval);
  }

  var actions = {
    first: function () { pause(); show(0); },
    previous: function () { pause(); show(current - 1); },
    reverse: function () { play(-1); },
    pause: pause,
    play: function () { play(1); },
    next: function () { pause(); show(current + 1); },
    last: function () { pause(); show(frames.length - 1); },
    slower: function () { interval = interval * 1.2; if (timer !== null) { play(direction); } },
    faster: function () { interval = Math.max(10, interval / 1.2); if (timer !== null) { play(direction); } }
  };

  root.querySelectorAll("button[data-action]").forEach(function (button) {
    button.addEventListener("click", actions[button.getAttribute("data-action")]);
  });
  slider.addEventListener("input", function () {
    pause();
    show(parseInt(slider.value, 10));
  });

  show(0);
  play(1);
})();
</script>
</body>
</html>
"##;
