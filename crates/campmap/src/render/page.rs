//! Page skeleton for generated maps.
//!
//! Placeholders are written as `{{NAME}}` and filled in a single pass by
//! [`fill`], so substituted text is never scanned again.

/// Complete HTML document with Leaflet loaded from a CDN.
pub const PAGE_TEMPLATE: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{{TITLE}}</title>
  <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
  <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
  <style>
    html, body { height: 100%; margin: 0; padding: 0; }
    #map { position: absolute; top: 0; bottom: 0; right: 0; left: 0; }
    .camp-modal { display: none; position: fixed; top: 0; left: 0; width: 100%; height: 100%;
                  background-color: rgba(0, 0, 0, 0.8); z-index: 9999; cursor: pointer; }
    .camp-modal .close { position: absolute; top: 20px; right: 30px; color: white;
                         font-size: 40px; cursor: pointer; z-index: 10000; }
    .camp-modal .frame { display: flex; align-items: center; justify-content: center;
                         height: 100%; padding: 20px; }
    .camp-modal .content { text-align: center; max-width: 90%; max-height: 90%; }
    .camp-modal img { max-width: 100%; max-height: 80vh; object-fit: contain; }
    .camp-modal h2, .camp-modal p { color: white; }
    .camp-button { color: white; text-decoration: none; padding: 8px 15px; border-radius: 4px;
                   display: inline-block; width: 150px; text-align: center; }
  </style>
</head>
<body>
  <div id="map"></div>
{{MODALS}}
{{LEGEND}}
{{STATS}}
  <script>
    var map = L.map('map').setView([{{CENTER_LAT}}, {{CENTER_LON}}], {{ZOOM}});
    L.tileLayer({{TILE_URL}}, { attribution: {{TILE_ATTRIBUTION}}, maxZoom: 19 }).addTo(map);

    var camps = {{MARKERS}};
    camps.forEach(function (camp) {
      var icon = L.icon({ iconUrl: camp.icon, iconSize: [camp.size, camp.size] });
      L.marker([camp.lat, camp.lon], { icon: icon })
        .bindPopup(camp.popup, { maxWidth: {{POPUP_MAX_WIDTH}} })
        .bindTooltip(camp.tooltip)
        .addTo(map);
    });

    function openModal(modalId) {
      document.getElementById(modalId).style.display = 'block';
      document.body.style.overflow = 'hidden';
    }

    function closeModal(modalId) {
      document.getElementById(modalId).style.display = 'none';
      document.body.style.overflow = 'auto';
    }

    document.addEventListener('click', function (event) {
      var target = event.target;
      if (target.classList.contains('camp-modal') || target.classList.contains('frame')) {
        closeModal(target.closest('.camp-modal').id);
      }
    });

    document.addEventListener('keydown', function (event) {
      if (event.key === 'Escape') {
        document.querySelectorAll('.camp-modal').forEach(function (modal) {
          if (modal.style.display === 'block') {
            closeModal(modal.id);
          }
        });
      }
    });
  </script>
</body>
</html>
"#;

/// Substitute `{{KEY}}` placeholders from `values`.
///
/// Unknown placeholders are left as they are.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };

        let key = &after[..end];
        match values.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}
