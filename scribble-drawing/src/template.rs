//! Markup and style sheet of the drawing element.

/// Content subtree: menu toggle, menubar actions, colour picker, canvas.
pub const TEMPLATE: &str = r##"
  <input id="drawing-menubar-checkbox" type="checkbox">
  <div id="drawing-menubar">
    <div id="drawing-menubar-action-close">
      <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 352 512"><path d="M242.72 256l100.07-100.07c12.28-12.28 12.28-32.19 0-44.48l-22.24-22.24c-12.28-12.28-32.19-12.28-44.48 0L176 189.28 75.93 89.21c-12.28-12.28-32.19-12.28-44.48 0L9.21 111.45c-12.28 12.28-12.28 32.19 0 44.48L109.28 256 9.21 356.07c-12.28 12.28-12.28 32.19 0 44.48l22.24 22.24c12.28 12.28 32.2 12.28 44.48 0L176 322.72l100.07 100.07c12.28 12.28 32.2 12.28 44.48 0l22.24-22.24c12.28-12.28 12.28-32.19 0-44.48L242.72 256z"/></svg>
    </div>
    <div id="drawing-menubar-action-color">
      <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 512 512"><path d="M204.3 5C104.9 24.4 24.8 104.3 5.2 203.4c-37 187 131.7 326.4 258.8 306.7 41.2-6.4 61.4-54.6 42.5-91.7-23.1-45.4 9.9-98.4 60.9-98.4h79.7c35.8 0 64.8-29.6 64.9-65.3C511.5 97.1 368.1-26.9 204.3 5zM96 320c-17.7 0-32-14.3-32-32s14.3-32 32-32 32 14.3 32 32-14.3 32-32 32zm32-128c-17.7 0-32-14.3-32-32s14.3-32 32-32 32 14.3 32 32-14.3 32-32 32zm128-64c-17.7 0-32-14.3-32-32s14.3-32 32-32 32 14.3 32 32-14.3 32-32 32zm128 64c-17.7 0-32-14.3-32-32s14.3-32 32-32 32 14.3 32 32-14.3 32-32 32z"/></svg>
    </div>
    <div id="drawing-menubar-action-clear">
      <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 448 512"><path d="M32 464a48 48 0 0 0 48 48h288a48 48 0 0 0 48-48V128H32zm272-256a16 16 0 0 1 32 0v224a16 16 0 0 1-32 0zm-96 0a16 16 0 0 1 32 0v224a16 16 0 0 1-32 0zm-96 0a16 16 0 0 1 32 0v224a16 16 0 0 1-32 0zM432 32H312l-9.4-18.7A24 24 0 0 0 281.1 0H166.8a23.72 23.72 0 0 0-21.4 13.3L136 32H16A16 16 0 0 0 0 48v32a16 16 0 0 0 16 16h416a16 16 0 0 0 16-16V48a16 16 0 0 0-16-16z"/></svg>
    </div>
  </div>
  <div id="drawing-menubar-colors">
    <div id="drawer-menubar-colors-black"></div>
    <div id="drawer-menubar-colors-orange"></div>
    <div id="drawer-menubar-colors-blue"></div>
    <div id="drawer-menubar-colors-green"></div>
  </div>
  <canvas width="2000" height="2000"></canvas>
  "##;

pub const STYLE: &str = r##"
  :host {
    position: relative;
    display: block;
    touch-action: none;
  }

  canvas {
    width: 100%;
    background-image: -webkit-repeating-radial-gradient(center center, rgba(0,0,0,.2), rgba(0,0,0,.2) 1px, transparent 1px, transparent 100%);
    background-size: 1rem 1rem;
  }
  
  #drawing-area {
    position: relative;
  }
  
  #drawing-menubar-checkbox {
    position: absolute;
    right: .5rem;
    top: .5rem;
    width: var(--drawing-menubar-icon-size);
    height: var(--drawing-menubar-icon-size);
    cursor: pointer;
    opacity: 0;
    z-index: 3;
  }
  
  #drawing-menubar {
    position: absolute;
    right: .5rem;
    top: .5rem;
    width: var(--drawing-menubar-icon-size);
    height: var(--drawing-menubar-icon-size);;
    /* padding-top: calc(var(--drawing-menubar-icon-size) - .6rem);*/
    background-color: var(--theme-highlight);
    overflow: hidden;
    border-radius: 50%;
    border: .3rem solid var(--theme-highlight);
    box-shadow: inset 0 0 0 .1rem var(--background-color);
    box-sizing: border-box;
    transition: box-shadow .5s, height .5s, border .2s, border-radius .5s, background-color .2s;
  }
  
  #drawing-menubar-checkbox:checked ~ #drawing-menubar {
    height: calc(3 * var(--drawing-menubar-icon-size));
    box-shadow: inset 0 0 0 0 var(--theme-highlight);
    border-radius: .3rem;
    border: 0 solid var(--theme-yellow);
    background-color: var(--theme-highlight-complementary);
  }
  
  #drawing-menubar > div {
    height: var(--drawing-menubar-icon-size);
    width: var(--drawing-menubar-icon-size);
    cursor: pointer;
    display: flex;
    transition: background-color .1s;
  }
  
  #drawing-menubar-action-close svg {
    opacity: 0;
  }
  
  #drawing-menubar-checkbox:checked ~ #drawing-menubar > #drawing-menubar-action-close svg {
    opacity: 1;
    transform: rotate(90deg);
    transition: opacity .5s, transform .5s;
    transition-delay: .2s;
  }
  
  #drawing-menubar-action-color {
    background-color: var(--theme-blue)
  }
  
  #drawing-menubar-action-clear {
    background-color: var(--theme-highlight-light)
  }
  
  #drawing-menubar svg {
    fill: var(--background-color);
    margin: auto;
    height: 2rem;
  }
  
  #drawing-menubar-checkbox:not(:checked) ~ #drawing-menubar > div:not(:first-child) {
    background-color: var(--theme-highlight) !important;
    transition: background-color .2s;
  }
  
  #drawing-menubar-colors {
    position: absolute;
    top: calc(1.41 * var(--drawing-menubar-icon-size));
    right: calc(1.3 * var(--drawing-menubar-icon-size));
    display: flex;
    justify-content: space-between;
    width: 0;
  }
  
  #drawing-menubar-colors > div {
    border-radius: 50%;
    width: 1.9rem;
    height: 1.9rem;
    box-sizing: border-box;
    cursor: pointer;
  }
  
  #drawing-menubar-colors > div:hover {
    transform: scale(1.2);
    transition: all .2s;
  }
  
  #drawing-menubar-checkbox:checked ~ #drawing-menubar-colors {
    width: 10rem;
    transition: width .5s;
    transition-delay: .7s;
  }
  
  #drawer-menubar-colors-black {
    background-color: #333;
  }
  #drawer-menubar-colors-orange {
    background-color: var(--theme-orange);
  }
  #drawer-menubar-colors-blue {
    background-color: var(--theme-blue);
  }
  #drawer-menubar-colors-green {
    background-color: var(--theme-green);
  }
  "##;

/// Selector of the drawing surface.
pub const CANVAS_SELECTOR: &str = "canvas";
/// Checkbox that keeps the menubar open while checked.
pub const MENU_CHECKBOX_ID: &str = "drawing-menubar-checkbox";
/// Menubar entry showing the current colour.
pub const COLOR_INDICATOR_ID: &str = "drawing-menubar-action-color";
pub const CLEAR_ACTION_ID: &str = "drawing-menubar-action-clear";
