/// Page served by the live player; frames arrive over server-sent events
pub const LIVE_PAGE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{{TITLE}}</title>
<style>
  body { margin: 16px; background: #fafafa; font-family: Arial, Helvetica, sans-serif; }
  .stage { position: relative; width: {{WIDTH}}px; max-width: 100%; aspect-ratio: {{WIDTH}} / {{HEIGHT}}; }
  .stage img { position: absolute; top: 0; left: 0; width: 100%; height: 100%; }
  .status { color: #4f4f4f; font-size: 13px; margin-top: 6px; }
</style>
</head>
<body>
<div class="stage">
  <img alt="" src="{{BACKGROUND_URL}}">
  <img id="frame" alt="{{TITLE}}">
</div>
<div class="status" id="status">waiting for frames</div>
<script>
(function () {
  "use strict";
  var image = document.getElementById("frame");
  var status = document.getElementById("status");
  var source = new EventSource("{{EVENTS_URL}}");
  source.onmessage = function (message) {
    var frame = JSON.parse(message.data);
    image.src = frame.image;
    status.textContent = "frame " + (frame.frame + 1) + " / " + frame.total + " (" + frame.date + ")";
  };
  source.onerror = function () {
    status.textContent = "disconnected";
  };
})();
</script>
</body>
</html>
"##;
