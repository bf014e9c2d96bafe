use crate::tooltip::{ACTIVE_CLASS, Horizontal, TOOLTIP_GAP, VIEWPORT_MARGIN, Vertical};

/// Wraps the rendered `#calendar-container` markup in the page shell.
pub fn render_index(calendar_html: &str) -> String {
    INDEX_HTML
        .replace("{{MARGIN}}", &VIEWPORT_MARGIN.to_string())
        .replace("{{GAP}}", &TOOLTIP_GAP.to_string())
        .replace("{{ACTIVE}}", ACTIVE_CLASS)
        .replace("{{TOP}}", Vertical::Top.css_class())
        .replace("{{BOTTOM}}", Vertical::Bottom.css_class())
        .replace("{{ALIGN_LEFT}}", Horizontal::AlignLeft.css_class().unwrap_or_default())
        .replace("{{ALIGN_RIGHT}}", Horizontal::AlignRight.css_class().unwrap_or_default())
        .replace("{{CALENDAR}}", calendar_html)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="ja">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>需要カレンダー</title>
  <style>
    :root {
      --bg: #f6f4ef;
      --ink: #2b2a28;
      --muted: #8b857d;
      --card: #ffffff;
      --high: #e5534b;
      --medium: #f2c14e;
      --low: #d9ead3;
      --shadow: 0 12px 32px rgba(47, 72, 88, 0.16);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Hiragino Sans", "Noto Sans JP", "Trebuchet MS", sans-serif;
      padding: 24px 16px 48px;
    }

    h1 {
      margin: 0 0 20px;
      font-size: clamp(1.6rem, 3vw, 2.2rem);
    }

    .year-calendar {
      margin-bottom: 40px;
    }

    .year-title {
      margin: 0 0 16px;
    }

    .month-grid {
      display: grid;
      grid-template-columns: repeat(auto-fill, minmax(240px, 1fr));
      gap: 16px;
    }

    .month-calendar {
      background: var(--card);
      border-radius: 12px;
      padding: 12px;
      box-shadow: var(--shadow);
    }

    .month-title {
      margin: 0 0 8px;
      font-size: 1rem;
    }

    .weekdays,
    .day-grid {
      display: grid;
      grid-template-columns: repeat(7, 1fr);
      gap: 4px;
      text-align: center;
    }

    .weekdays span {
      font-size: 0.75rem;
      color: var(--muted);
    }

    .day {
      position: relative;
      padding: 6px 0;
      border-radius: 6px;
      font-size: 0.85rem;
      cursor: default;
    }

    .day.empty {
      visibility: hidden;
    }

    .day.high-demand {
      background: var(--high);
      color: white;
      cursor: pointer;
    }

    .day.medium-demand {
      background: var(--medium);
      cursor: pointer;
    }

    .day.low-demand {
      background: var(--low);
      cursor: pointer;
    }

    .tooltip {
      position: absolute;
      left: 50%;
      bottom: calc(100% + {{GAP}}px);
      transform: translateX(-50%);
      z-index: 10;
      width: max-content;
      max-width: 280px;
      padding: 10px 12px;
      border-radius: 8px;
      background: #2f4858;
      color: white;
      text-align: left;
      font-size: 0.8rem;
      line-height: 1.4;
      visibility: hidden;
      opacity: 0;
      pointer-events: none;
      transition: opacity 120ms ease;
    }

    .tooltip p,
    .tooltip ul {
      margin: 4px 0 0;
    }

    .tooltip ul {
      padding-left: 18px;
    }

    .tooltip.{{ACTIVE}} {
      visibility: visible;
      opacity: 1;
    }

    .tooltip.{{ALIGN_RIGHT}} {
      left: auto;
      right: 50%;
      transform: none;
    }

    .tooltip.{{ALIGN_LEFT}} {
      left: 50%;
      transform: none;
    }

    .tooltip.{{BOTTOM}} {
      bottom: auto;
      top: calc(100% + {{GAP}}px);
    }
  </style>
</head>
<body>
  <h1>需要カレンダー</h1>
  {{CALENDAR}}
  <script>
    const MARGIN = {{MARGIN}};
    const ACTIVE = '{{ACTIVE}}';
    const TOP = '{{TOP}}';
    const BOTTOM = '{{BOTTOM}}';
    const ALIGN_LEFT = '{{ALIGN_LEFT}}';
    const ALIGN_RIGHT = '{{ALIGN_RIGHT}}';

    const controller = {
      active: null,

      place(tooltip) {
        tooltip.classList.remove(ALIGN_LEFT, ALIGN_RIGHT, BOTTOM);
        tooltip.classList.add(TOP);
        const rect = tooltip.getBoundingClientRect();

        if (rect.right > window.innerWidth - MARGIN) {
          tooltip.classList.add(ALIGN_RIGHT);
        }
        if (rect.left < MARGIN) {
          tooltip.classList.remove(ALIGN_RIGHT);
          tooltip.classList.add(ALIGN_LEFT);
        }
        if (rect.bottom > window.innerHeight - MARGIN || rect.top < MARGIN) {
          tooltip.classList.remove(TOP);
          tooltip.classList.add(BOTTOM);
        }
      },

      activate(tooltip) {
        this.place(tooltip);
        tooltip.classList.add(ACTIVE);
        this.active = tooltip;
      },

      deactivate() {
        if (this.active) {
          this.active.classList.remove(ACTIVE);
          this.active = null;
        }
      },

      hoverEnter(tooltip) {
        if (!this.active) {
          this.activate(tooltip);
        }
      },

      hoverLeave(tooltip) {
        if (this.active === tooltip) {
          this.deactivate();
        }
      },

      tap(tooltip) {
        if (this.active === tooltip) {
          this.deactivate();
          return;
        }
        this.deactivate();
        this.activate(tooltip);
      },

      backgroundClick(target) {
        if (this.active && !target.closest('.day')) {
          this.deactivate();
        }
      }
    };

    document.querySelectorAll('#calendar-container .day[data-date]').forEach((cell) => {
      const tooltip = cell.querySelector('.tooltip');
      if (!tooltip) {
        return;
      }

      cell.addEventListener('pointerenter', (event) => {
        if (event.pointerType === 'mouse') {
          controller.hoverEnter(tooltip);
        }
      });

      cell.addEventListener('pointerleave', (event) => {
        if (event.pointerType === 'mouse') {
          controller.hoverLeave(tooltip);
        }
      });

      cell.addEventListener('click', (event) => {
        event.preventDefault();
        event.stopPropagation();
        controller.tap(tooltip);
      });
    });

    document.addEventListener('click', (event) => controller.backgroundClick(event.target));
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calendar_markup_is_embedded() {
        let page = render_index("<div id=\"calendar-container\"></div>");
        assert!(page.contains("<div id=\"calendar-container\"></div>"));
        assert!(!page.contains("{{"));
    }

    #[test]
    fn script_uses_placement_constants() {
        let page = render_index("");
        assert!(page.contains(&format!("const MARGIN = {};", VIEWPORT_MARGIN)));
        assert!(page.contains(&format!("calc(100% + {}px)", TOOLTIP_GAP)));
        assert!(page.contains(&format!("const ACTIVE = '{ACTIVE_CLASS}';")));
        assert!(page.contains("const TOP = 'top';"));
        assert!(page.contains("const BOTTOM = 'bottom';"));
        assert!(page.contains("const ALIGN_LEFT = 'align-left';"));
        assert!(page.contains("const ALIGN_RIGHT = 'align-right';"));
        assert!(page.contains(".tooltip.active {"));
        assert!(page.contains(".tooltip.bottom {"));
    }

    #[test]
    fn script_keeps_single_active_rules() {
        let page = render_index("");
        let hover_leave = page
            .split("hoverLeave(tooltip) {")
            .nth(1)
            .expect("hoverLeave handler");
        assert!(hover_leave.trim_start().starts_with("if (this.active === tooltip)"));

        let hover_enter = page
            .split("hoverEnter(tooltip) {")
            .nth(1)
            .expect("hoverEnter handler");
        assert!(hover_enter.trim_start().starts_with("if (!this.active)"));

        assert!(page.contains("event.stopPropagation();"));
        assert_eq!(page.matches("document.addEventListener('click'").count(), 1);
        assert!(page.contains("!target.closest('.day')"));
    }
}
